//! 선형 시스템 풀이
//!
//! - `ExactSolver`: 전체 정사각 기저에 대해 basis·x = b 를 LU 로 정확히 풂
//! - `ProjectionSolver`: 가지치기된 k개 기저 열에 대한 최소제곱 사영
//!
//! 사영은 정규방정식 (BᵀB)x = Bᵀb 를 Cholesky 로 풉니다.
//! 그람 행렬은 압축 호출당 한 번만 분해하고 모든 블록에 재사용합니다.


use crate::core::error::ConfigError;
use log::debug;
use nalgebra::{Cholesky, DMatrix, DVector, Dyn, LU};

/// 전체 기저의 LU 분해. 생성 후 불변이며 스레드 간 공유 가능.
#[derive(Debug, Clone)]
pub struct ExactSolver {
    lu: LU<f64, Dyn, Dyn>,
    dimension: usize,
}

impl ExactSolver {
    /// 피벗 크기 기준 상대 허용 오차 (N·ε 배)
    const PIVOT_TOLERANCE: f64 = 16.0;

    /// 정사각이 아니거나 (수치적으로) 특이한 기저는 설정 오류
    pub fn new(basis: &DMatrix<f64>) -> Result<Self, ConfigError> {
        let (rows, cols) = basis.shape();
        if rows != cols {
            return Err(ConfigError::NonSquareBasis { rows, cols });
        }
        if rows == 0 {
            return Err(ConfigError::SingularBasis);
        }

        let lu = basis.clone().lu();
        let pivots = lu.u().diagonal().map(f64::abs);
        let largest = pivots.max();
        let smallest = pivots.min();
        let threshold = largest * rows as f64 * f64::EPSILON * Self::PIVOT_TOLERANCE;
        // NaN 피벗도 여기서 걸러짐
        if !(largest > 0.0 && smallest > threshold) {
            return Err(ConfigError::SingularBasis);
        }

        debug!("기저 LU 분해 완료: N={}, 피벗 범위 [{:.3e}, {:.3e}]", rows, smallest, largest);
        Ok(Self { lu, dimension: rows })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 블록 벡터를 전체 기저 계수로 분해
    pub fn solve(&self, block: &DVector<f64>) -> Result<DVector<f64>, ConfigError> {
        self.lu.solve(block).ok_or(ConfigError::SingularBasis)
    }
}

/// 가지치기된 부분 기저 위로의 직교 사영
#[derive(Debug, Clone)]
pub struct ProjectionSolver {
    sub_basis: DMatrix<f64>,
    /// k = 0 이면 분해할 시스템이 없음
    gram: Option<Cholesky<f64, Dyn>>,
}

impl ProjectionSolver {
    /// `retained` 는 오름차순, [0, N) 범위로 이미 검증된 인덱스
    pub fn new(basis: &DMatrix<f64>, retained: &[usize]) -> Result<Self, ConfigError> {
        let sub_basis = select_columns(basis, retained);
        if retained.is_empty() {
            return Ok(Self { sub_basis, gram: None });
        }

        let gram = sub_basis.tr_mul(&sub_basis);
        let cholesky = Cholesky::new(gram).ok_or(ConfigError::DegenerateProjection {
            retained: retained.len(),
        })?;

        debug!("그람 행렬 Cholesky 분해 완료: k={}", retained.len());
        Ok(Self {
            sub_basis,
            gram: Some(cholesky),
        })
    }

    /// 유지된 기저 개수 k
    pub fn retained(&self) -> usize {
        self.sub_basis.ncols()
    }

    pub fn sub_basis(&self) -> &DMatrix<f64> {
        &self.sub_basis
    }

    /// ‖B·x − b‖ 를 최소화하는 계수 x (길이 k)
    pub fn project(&self, block: &DVector<f64>) -> DVector<f64> {
        match &self.gram {
            Some(cholesky) => cholesky.solve(&self.sub_basis.tr_mul(block)),
            None => DVector::zeros(0),
        }
    }
}

/// 기저 행렬에서 지정한 열만 뽑은 N×k 행렬
pub fn select_columns(basis: &DMatrix<f64>, indices: &[usize]) -> DMatrix<f64> {
    if indices.is_empty() {
        return DMatrix::zeros(basis.nrows(), 0);
    }
    basis.select_columns(indices.iter())
}

/// Σ coefficient[m] · column[m]. 부분 기저가 비어 있으면 영벡터.
pub fn linear_combination(sub_basis: &DMatrix<f64>, coefficients: &[f32]) -> DVector<f64> {
    if sub_basis.ncols() == 0 {
        return DVector::zeros(sub_basis.nrows());
    }
    let weights = DVector::from_iterator(coefficients.len(), coefficients.iter().map(|&c| c as f64));
    sub_basis * weights
}
