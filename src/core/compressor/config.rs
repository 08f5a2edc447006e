use crate::core::basis::BasisKind;
use crate::core::error::ConfigError;
use crate::core::record::DEFAULT_MAX_PIXELS;
use serde::{Deserialize, Serialize};

/// 기본 블록 크기 (16×16 → N = 256)
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// 압축기 설정
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// 가지치기 없이 유지할 기저 방향의 비율 [0, 1]
    pub quality: f64,
    /// 블록 한 변의 길이
    pub block_size: usize,
    /// 기본 제공 기저 종류
    pub basis: BasisKind,
    /// 복원을 허용하는 최대 픽셀 수 (width × height)
    pub max_pixels: u64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            quality: 0.5,
            block_size: DEFAULT_BLOCK_SIZE,
            basis: BasisKind::Trigonometric,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl CompressorConfig {
    pub fn new(quality: f64, block_size: usize) -> Self {
        Self {
            quality,
            block_size,
            ..Self::default()
        }
    }

    pub fn with_basis(mut self, basis: BasisKind) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// 블록당 원소 수 = 기저 크기
    pub fn basis_size(&self) -> usize {
        self.block_size * self.block_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_quality(self.quality)?;
        if self.block_size == 0 || self.block_size.checked_mul(self.block_size).is_none() {
            return Err(ConfigError::InvalidBlockSize);
        }
        Ok(())
    }
}

pub(crate) fn validate_quality(quality: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&quality) {
        Ok(())
    } else {
        Err(ConfigError::InvalidQuality(quality))
    }
}
