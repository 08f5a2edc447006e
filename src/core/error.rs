//! 코덱 에러 타입
//!
//! 생성 시점의 설정 오류, 직렬화 경계의 디코드 오류,
//! 디코드된 기저 인덱스 검증 오류를 구분합니다.

use thiserror::Error;

/// 생성 시점(또는 기저 조건수 문제)에서 발생하는 치명적 설정 오류
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("basis must be square, got {rows}x{cols}")]
    NonSquareBasis { rows: usize, cols: usize },
    #[error("basis size {actual} does not match block size squared ({expected})")]
    BasisSizeMismatch { expected: usize, actual: usize },
    #[error("basis size {size} is not a power of two")]
    NotPowerOfTwo { size: usize },
    #[error("basis matrix is singular")]
    SingularBasis,
    #[error("quality must lie in [0, 1], got {0}")]
    InvalidQuality(f64),
    #[error("block size must be positive")]
    InvalidBlockSize,
    #[error("gram matrix of {retained} retained basis vectors is not positive definite")]
    DegenerateProjection { retained: usize },
}

/// 잘렸거나 구조가 깨진 압축 레코드
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("compressed record is truncated")]
    Truncated,
    #[error("invalid magic: 0x{0:02X}")]
    BadMagic(u8),
    #[error("unsupported record version {0}")]
    UnsupportedVersion(u8),
    #[error("block size mismatch: expected {expected}, record has {actual}")]
    BlockSizeMismatch { expected: usize, actual: usize },
    #[error("CRC mismatch: expected 0x{expected:04X}, got 0x{actual:04X}")]
    ChecksumMismatch { expected: u16, actual: u16 },
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),
    #[error("image {width}x{height} exceeds the limit of {limit} pixels")]
    ImageTooLarge { width: u32, height: u32, limit: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 신뢰할 수 없는 입력에서 온 기저 인덱스/계수 구조 검증 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsorted basis vectors in decoded image (position {position})")]
    UnsortedBasis { position: usize },
    #[error("basis index {index} overflows basis of size {limit}")]
    BasisIndexOutOfRange { index: u32, limit: usize },
    #[error("record block size {actual} does not match compressor block size {expected}")]
    BlockSizeMismatch { expected: usize, actual: usize },
    #[error("expected {expected} coefficient vectors, found {actual}")]
    BlockCountMismatch { expected: usize, actual: usize },
    #[error("coefficient vector {block} has length {actual}, expected {expected}")]
    CoefficientLength { block: usize, expected: usize, actual: usize },
    #[error("image {width}x{height} exceeds the limit of {limit} pixels")]
    ImageTooLarge { width: u32, height: u32, limit: u64 },
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
