//! # 기저 블록 코덱 핵심 모듈
//!
//! 기저 생성, 블록 변환, 선형 풀이, 중요도 순위, 압축기 구성 요소들

pub mod error;
pub mod basis;
pub mod blocks;
pub mod solver;
pub mod ranking;
pub mod record;
pub mod compressor;

// 주요 타입들 재수출
pub use error::{CodecError, ConfigError, DecodeError, Result, ValidationError};
pub use basis::{build_basis, normalize_columns, orthogonal_basis, trigonometric_basis, BasisKind};
pub use blocks::{assemble_image, extract_blocks, BlockLayout, Bounds, Raster, Rgba16Image, Viewport};
pub use solver::{ExactSolver, ProjectionSolver};
pub use ranking::{retained_count, ImportanceTable};
pub use record::{CompressedImage, DEFAULT_MAX_PIXELS};
pub use compressor::{Compressor, CompressorConfig, QualityStats, DEFAULT_BLOCK_SIZE};
