//! 압축 레코드와 이진 직렬화
//!
//! 레이아웃 (리틀 엔디언):
//! ```text
//! u8  magic (0xB5) | u8 version (1)
//! u32 width | u32 height | u32 block_size
//! u32 k     | k × u32 유지 기저 인덱스
//! u32 count | count × k × f32 계수
//! u16 CRC16/XMODEM (앞의 모든 바이트)
//! ```
//!
//! k = 0 이면 계수 벡터는 저장되지 않고 count 는 레이아웃의 벡터 수입니다.
//!
//! 디코더는 구조(길이, 블록 크기, 픽셀 한도, 블록 개수, 체크섬)만 검증합니다.
//! 인덱스 범위와 순서 검증은 압축기의 몫입니다.


use crate::core::blocks::BlockLayout;
use crate::core::error::DecodeError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// 디코드가 허용하는 기본 최대 픽셀 수 (8192 × 8192)
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 26;

/// 압축된 이미지의 논리 스키마
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedImage {
    pub width: u32,
    pub height: u32,
    pub block_size: u32,
    /// 오름차순 유지 기저 인덱스 (디코드 직후에는 신뢰할 수 없음)
    pub retained_basis: Vec<u32>,
    /// 블록 행 우선, 블록마다 R, G, B. 각 길이 = retained_basis.len().
    /// 유지 집합이 비어 있으면 비어 있음.
    pub coefficients: Vec<Vec<f32>>,
}

impl CompressedImage {
    pub const MAGIC: u8 = 0xB5;
    pub const VERSION: u8 = 1;

    /// 헤더(매직, 버전, 크기 3개, k, count) + CRC
    const FIXED_LEN: usize = 1 + 1 + 4 * 3 + 4 + 4 + 2;

    pub fn layout(&self) -> BlockLayout {
        BlockLayout::new(self.block_size as usize, self.width as usize, self.height as usize)
    }

    /// 직렬화된 크기 (바이트)
    pub fn encoded_len(&self) -> usize {
        let k = self.retained_basis.len();
        Self::FIXED_LEN + 4 * k + 4 * k * self.coefficients.len()
    }

    /// 직렬화될 count 필드
    fn vector_count_field(&self) -> Result<u32, DecodeError> {
        if !self.retained_basis.is_empty() {
            return to_u32(self.coefficients.len());
        }
        if self.block_size == 0 {
            return Err(DecodeError::Malformed("zero block size".to_string()));
        }
        let count = self
            .layout()
            .checked_vector_count()
            .ok_or_else(|| DecodeError::Malformed("vector count overflows".to_string()))?;
        to_u32(count)
    }

    /// 계수 벡터 길이가 k 와 다르면 `Malformed`. k = 0 이면 계수는 기록하지 않음.
    pub fn encode(&self) -> Result<Vec<u8>, DecodeError> {
        let k = self.retained_basis.len();
        let mut buffer = Vec::with_capacity(self.encoded_len());

        buffer.push(Self::MAGIC);
        buffer.push(Self::VERSION);
        buffer.write_u32::<LittleEndian>(self.width)?;
        buffer.write_u32::<LittleEndian>(self.height)?;
        buffer.write_u32::<LittleEndian>(self.block_size)?;

        buffer.write_u32::<LittleEndian>(to_u32(k)?)?;
        for &index in &self.retained_basis {
            buffer.write_u32::<LittleEndian>(index)?;
        }

        buffer.write_u32::<LittleEndian>(self.vector_count_field()?)?;
        let stored = if k == 0 { &[][..] } else { &self.coefficients[..] };
        for (block, coeffs) in stored.iter().enumerate() {
            if coeffs.len() != k {
                return Err(DecodeError::Malformed(format!(
                    "coefficient vector {} has length {}, expected {}",
                    block,
                    coeffs.len(),
                    k
                )));
            }
            for &c in coeffs {
                buffer.write_f32::<LittleEndian>(c)?;
            }
        }

        let crc = crc16::State::<crc16::XMODEM>::calculate(&buffer);
        buffer.write_u16::<LittleEndian>(crc)?;
        Ok(buffer)
    }

    /// `block_size` 는 디코딩하는 쪽이 기대하는 블록 크기.
    /// 픽셀 한도는 [`DEFAULT_MAX_PIXELS`].
    pub fn decode(data: &[u8], block_size: usize) -> Result<Self, DecodeError> {
        Self::decode_with_limit(data, block_size, DEFAULT_MAX_PIXELS)
    }

    /// width × height 가 `max_pixels` 를 넘으면 어떤 할당도 하기 전에 `ImageTooLarge`
    pub fn decode_with_limit(data: &[u8], block_size: usize, max_pixels: u64) -> Result<Self, DecodeError> {
        if data.len() < Self::FIXED_LEN {
            return Err(DecodeError::Truncated);
        }

        let body_len = data.len() - 2;
        let (body, trailer) = data.split_at(body_len);
        let expected_crc = Cursor::new(trailer).read_u16::<LittleEndian>()?;
        let actual_crc = crc16::State::<crc16::XMODEM>::calculate(body);
        if expected_crc != actual_crc {
            return Err(DecodeError::ChecksumMismatch {
                expected: expected_crc,
                actual: actual_crc,
            });
        }

        let mut cursor = Cursor::new(body);
        let magic = cursor.read_u8().map_err(truncated)?;
        if magic != Self::MAGIC {
            return Err(DecodeError::BadMagic(magic));
        }
        let version = cursor.read_u8().map_err(truncated)?;
        if version != Self::VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let width = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let height = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        let recorded_block_size = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
        if recorded_block_size as usize != block_size {
            return Err(DecodeError::BlockSizeMismatch {
                expected: block_size,
                actual: recorded_block_size as usize,
            });
        }
        if block_size == 0 {
            return Err(DecodeError::Malformed("zero block size".to_string()));
        }
        if width as u64 * height as u64 > max_pixels {
            return Err(DecodeError::ImageTooLarge {
                width,
                height,
                limit: max_pixels,
            });
        }

        let k = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        ensure_remaining(&cursor, k.checked_mul(4))?;
        let mut retained_basis = vec![0u32; k];
        cursor
            .read_u32_into::<LittleEndian>(&mut retained_basis)
            .map_err(truncated)?;

        let count = cursor.read_u32::<LittleEndian>().map_err(truncated)? as usize;
        let layout = BlockLayout::new(block_size, width as usize, height as usize);
        let expected = layout.checked_vector_count();
        if expected != Some(count) {
            return Err(DecodeError::Malformed(format!(
                "{} coefficient vectors for a {}x{} image with block size {}",
                count, width, height, block_size
            )));
        }
        ensure_remaining(&cursor, count.checked_mul(k).and_then(|n| n.checked_mul(4)))?;

        let mut coefficients = Vec::new();
        if k > 0 {
            coefficients.reserve_exact(count);
            for _ in 0..count {
                let mut coeffs = vec![0f32; k];
                cursor
                    .read_f32_into::<LittleEndian>(&mut coeffs)
                    .map_err(truncated)?;
                coefficients.push(coeffs);
            }
        }

        let trailing = remaining(&cursor);
        if trailing != 0 {
            return Err(DecodeError::TrailingBytes(trailing));
        }

        Ok(Self {
            width,
            height,
            block_size: recorded_block_size,
            retained_basis,
            coefficients,
        })
    }
}

fn to_u32(value: usize) -> Result<u32, DecodeError> {
    u32::try_from(value).map_err(|_| DecodeError::Malformed(format!("length {} exceeds u32", value)))
}

fn truncated(_: std::io::Error) -> DecodeError {
    DecodeError::Truncated
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

/// 길이 필드를 믿고 할당하기 전에 남은 바이트를 확인
fn ensure_remaining(cursor: &Cursor<&[u8]>, needed: Option<usize>) -> Result<(), DecodeError> {
    match needed {
        Some(n) if n <= remaining(cursor) => Ok(()),
        _ => Err(DecodeError::Truncated),
    }
}
