//! 기저 가지치기 압축기
//!
//! 이미지의 각 블록을 기저 계수로 바꾸고, 이미지 전체에서 가장 적게 쓰인
//! 기저 방향을 버린 뒤 남은 계수만 저장합니다.
//!
//! 압축: 블록 추출 → 전체 기저 정확해 → 중요도 순위 → 유지 집합 선택
//!       → 부분 기저 최소제곱 사영 → 레코드
//! 복원: 레코드 디코드 → 유지 집합 검증 → 선형결합 → 이미지 재구성

pub mod config;
pub mod quality;


pub use config::{CompressorConfig, DEFAULT_BLOCK_SIZE};
pub use quality::{psnr, rmse, QualityStats};

use crate::core::basis::build_basis;
use crate::core::blocks::{assemble_image, extract_blocks, Raster};
use crate::core::error::{ConfigError, Result, ValidationError};
use crate::core::ranking::{retained_count, ImportanceTable};
use crate::core::record::{CompressedImage, DEFAULT_MAX_PIXELS};
use crate::core::solver::{linear_combination, select_columns, ExactSolver, ProjectionSolver};
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// 블록 단위 기저 가지치기 압축기
///
/// 기저 행렬과 그 LU 분해는 생성 시 한 번 계산되며 이후 불변입니다.
/// 서로 다른 이미지에 대한 동시 compress/decompress 호출에 공유할 수 있습니다.
#[derive(Debug, Clone)]
pub struct Compressor {
    quality: f64,
    block_size: usize,
    basis: DMatrix<f64>,
    solver: ExactSolver,
    max_pixels: u64,
}

impl Compressor {
    /// 기본 블록 크기와 삼각함수 기저
    pub fn new(quality: f64) -> std::result::Result<Self, ConfigError> {
        Self::with_block_size(quality, DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(quality: f64, block_size: usize) -> std::result::Result<Self, ConfigError> {
        Self::with_config(CompressorConfig::new(quality, block_size))
    }

    pub fn with_config(config: CompressorConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let basis = build_basis(config.basis, config.basis_size())?;
        Ok(Self::with_basis(config.quality, config.block_size, basis)?.with_max_pixels(config.max_pixels))
    }

    /// 사용자 지정 기저 (열 벡터 행렬, blockSize² 크기의 정사각).
    ///
    /// 열이 정규화되어 있으면 가지치기가 잘 동작하지만 직교일 필요는 없습니다.
    pub fn with_basis(
        quality: f64,
        block_size: usize,
        basis: DMatrix<f64>,
    ) -> std::result::Result<Self, ConfigError> {
        let config = CompressorConfig::new(quality, block_size);
        config.validate()?;

        let (rows, cols) = basis.shape();
        if rows != cols {
            return Err(ConfigError::NonSquareBasis { rows, cols });
        }
        if rows != config.basis_size() {
            return Err(ConfigError::BasisSizeMismatch {
                expected: config.basis_size(),
                actual: rows,
            });
        }

        let solver = ExactSolver::new(&basis)?;
        Ok(Self {
            quality,
            block_size,
            basis,
            solver,
            max_pixels: DEFAULT_MAX_PIXELS,
        })
    }

    /// 복원 시 허용하는 최대 픽셀 수를 바꿈
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn basis(&self) -> &DMatrix<f64> {
        &self.basis
    }

    /// 기저 크기 N
    pub fn basis_size(&self) -> usize {
        self.basis.nrows()
    }

    /// 이 압축기가 유지하는 기저 개수 k = round(quality × N)
    pub fn retained_count(&self) -> usize {
        retained_count(self.quality, self.basis_size())
    }

    /// 이미지를 압축해 직렬화된 레코드를 반환
    pub fn compress<R: Raster + Sync + ?Sized>(&self, image: &R) -> Result<Vec<u8>> {
        let record = self.compress_record(image)?;
        Ok(record.encode()?)
    }

    /// 직렬화 전 단계의 압축 레코드
    pub fn compress_record<R: Raster + Sync + ?Sized>(&self, image: &R) -> Result<CompressedImage> {
        let (layout, blocks) = extract_blocks(image, self.block_size);
        debug!(
            "블록 추출: {}x{} 이미지 → {}x{} 블록, 벡터 {}개",
            layout.width,
            layout.height,
            layout.cols,
            layout.rows,
            blocks.len()
        );

        let retained = self.rank_basis(&blocks)?;
        let projection = ProjectionSolver::new(&self.basis, &retained)?;

        let coefficients: Vec<Vec<f32>> = if retained.is_empty() {
            Vec::new()
        } else {
            blocks
                .par_iter()
                .map(|block| projection.project(block).iter().map(|&c| c as f32).collect())
                .collect()
        };

        info!(
            "압축 완료: {}x{}, 유지 기저 {}/{}",
            layout.width,
            layout.height,
            retained.len(),
            self.basis_size()
        );

        Ok(CompressedImage {
            width: layout.width as u32,
            height: layout.height as u32,
            block_size: self.block_size as u32,
            retained_basis: retained.into_iter().map(|i| i as u32).collect(),
            coefficients,
        })
    }

    /// 전역 중요도 상위 k 개 방향 (오름차순)
    fn rank_basis(&self, blocks: &[DVector<f64>]) -> Result<Vec<usize>> {
        let k = self.retained_count();
        if k == 0 {
            warn!("quality {} 에서 유지 기저가 0개: 모든 블록이 0 으로 복원됨", self.quality);
            return Ok(Vec::new());
        }

        let exact: Vec<DVector<f64>> = blocks
            .par_iter()
            .map(|block| self.solver.solve(block))
            .collect::<std::result::Result<_, _>>()?;
        let importance = ImportanceTable::accumulate(self.basis_size(), &exact);
        let retained = importance.select_retained(k);
        debug!("유지 기저 선택: {:?}", retained);
        Ok(retained)
    }

    /// 직렬화된 레코드를 복원
    pub fn decompress(&self, data: &[u8]) -> Result<RgbaImage> {
        let record = CompressedImage::decode_with_limit(data, self.block_size, self.max_pixels)?;
        self.decompress_record(&record)
    }

    /// 레코드를 검증한 뒤 원래 크기의 불투명 8비트 이미지로 재구성
    pub fn decompress_record(&self, record: &CompressedImage) -> Result<RgbaImage> {
        let retained = self.validate_record(record)?;
        let layout = record.layout();
        if retained.is_empty() {
            info!("복원 완료: {}x{}, 유지 기저 0/{}", layout.width, layout.height, self.basis_size());
            return Ok(RgbaImage::from_pixel(record.width, record.height, Rgba([0, 0, 0, u8::MAX])));
        }
        let sub_basis = select_columns(&self.basis, &retained);

        let blocks: Vec<DVector<f64>> = record
            .coefficients
            .par_iter()
            .map(|coeffs| linear_combination(&sub_basis, coeffs))
            .collect();

        info!(
            "복원 완료: {}x{}, 유지 기저 {}/{}",
            layout.width,
            layout.height,
            retained.len(),
            self.basis_size()
        );
        Ok(assemble_image(&layout, &blocks)?)
    }

    /// 기저 행렬을 인덱싱하기 전에 유지 집합과 계수 구조를 검증
    ///
    /// 유지 집합은 엄격한 오름차순이고 모든 인덱스가 [0, N) 이어야 한다.
    /// 유지 집합이 비어 있으면 저장된 계수는 무시된다.
    pub fn validate_record(&self, record: &CompressedImage) -> std::result::Result<Vec<usize>, ValidationError> {
        if record.block_size as usize != self.block_size {
            return Err(ValidationError::BlockSizeMismatch {
                expected: self.block_size,
                actual: record.block_size as usize,
            });
        }
        if record.width as u64 * record.height as u64 > self.max_pixels {
            return Err(ValidationError::ImageTooLarge {
                width: record.width,
                height: record.height,
                limit: self.max_pixels,
            });
        }

        let limit = self.basis_size();
        for (position, pair) in record.retained_basis.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(ValidationError::UnsortedBasis { position: position + 1 });
            }
        }
        if let Some(&index) = record.retained_basis.iter().find(|&&i| i as usize >= limit) {
            return Err(ValidationError::BasisIndexOutOfRange { index, limit });
        }

        let k = record.retained_basis.len();
        if k > 0 {
            let expected_blocks = record.layout().checked_vector_count();
            if expected_blocks != Some(record.coefficients.len()) {
                return Err(ValidationError::BlockCountMismatch {
                    expected: expected_blocks.unwrap_or(usize::MAX),
                    actual: record.coefficients.len(),
                });
            }
            if let Some((block, coeffs)) = record
                .coefficients
                .iter()
                .enumerate()
                .find(|(_, c)| c.len() != k)
            {
                return Err(ValidationError::CoefficientLength {
                    block,
                    expected: k,
                    actual: coeffs.len(),
                });
            }
        }

        Ok(record.retained_basis.iter().map(|&i| i as usize).collect())
    }

    /// 압축 → 복원 후 품질 통계
    pub fn evaluate<R: Raster + Sync + ?Sized>(&self, image: &R) -> Result<QualityStats> {
        let bytes = self.compress(image)?;
        let reconstructed = self.decompress(&bytes)?;
        Ok(QualityStats::measure(
            image,
            &reconstructed,
            bytes.len(),
            self.retained_count(),
            self.basis_size(),
        ))
    }
}
