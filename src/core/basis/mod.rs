//! 블록 공간의 기저 행렬 생성
//!
//! N = blockSize² 크기의 정사각 열(column) 기저를 만듭니다.
//! - 삼각함수 기저: cos/sin 쌍 + DC(모두 1) 벡터
//! - 재귀 직교 기저: [A -A; A A] 배가 구성

pub mod trigonometric;
pub mod orthogonal;


pub use trigonometric::trigonometric_basis;
pub use orthogonal::orthogonal_basis;

use crate::core::error::ConfigError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// 기본 제공 기저 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BasisKind {
    /// 삼각함수(DFT 계열) 기저
    #[default]
    Trigonometric,
    /// 재귀 직교 기저 (크기는 2의 거듭제곱이어야 함)
    Orthogonal,
}

/// 종류에 맞는 기저를 만들고 열을 단위 길이로 정규화
pub fn build_basis(kind: BasisKind, size: usize) -> Result<DMatrix<f64>, ConfigError> {
    match kind {
        BasisKind::Trigonometric => Ok(trigonometric_basis(size)),
        BasisKind::Orthogonal => {
            let mut basis = orthogonal_basis(size)?;
            normalize_columns(&mut basis);
            Ok(basis)
        }
    }
}

/// 각 열을 유클리드 노름 1로 맞춤. 영벡터 열은 그대로 둔다.
pub fn normalize_columns(matrix: &mut DMatrix<f64>) {
    for mut column in matrix.column_iter_mut() {
        let norm = column.norm();
        if norm > 0.0 {
            column /= norm;
        }
    }
}
