//! 기저 가지치기 이미지 압축 라이브러리
//!
//! 고정 크기 픽셀 블록을 선형 기저 계수로 바꾸고, 이미지 전체에서
//! 기여도가 가장 낮은 기저 방향을 버린 뒤 남은 계수만 저장합니다.

pub mod core;

// 핵심 모듈들 재수출
pub use crate::core::{
    // 압축기
    Compressor, CompressorConfig, QualityStats, DEFAULT_BLOCK_SIZE,
    // 기저
    BasisKind, build_basis, orthogonal_basis, trigonometric_basis,
    // 래스터 및 레코드
    Bounds, CompressedImage, Raster, Rgba16Image, Viewport, DEFAULT_MAX_PIXELS,
    // 에러
    CodecError, ConfigError, DecodeError, ValidationError,
};

pub type Result<T> = crate::core::Result<T>;
