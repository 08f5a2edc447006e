//! 블록 코덱
//!
//! 이미지를 blockSize×blockSize 블록 그리드로 나누고, 각 블록/채널을
//! 지그재그(serpentine) 순서의 길이 N 벡터로 변환하거나 그 역을 수행합니다.
//!
//! 벡터 순서: 블록 행 우선, 블록마다 R, G, B 채널.

pub mod raster;

#[cfg(test)]
mod __tests__;

pub use raster::{Bounds, Raster, Rgba16Image, Viewport};

use crate::core::error::ValidationError;
use image::{Rgba, RgbaImage};
use nalgebra::DVector;
use rayon::prelude::*;

/// 채널 수 (R, G, B)
pub const CHANNELS: usize = 3;

/// 이미지 크기와 블록 크기로 정해지는 블록 그리드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub block_size: usize,
    pub width: usize,
    pub height: usize,
    pub rows: usize,
    pub cols: usize,
}

impl BlockLayout {
    pub fn new(block_size: usize, width: usize, height: usize) -> Self {
        Self {
            block_size,
            width,
            height,
            rows: height.div_ceil(block_size),
            cols: width.div_ceil(block_size),
        }
    }

    /// 블록당 원소 수 N
    pub fn block_len(&self) -> usize {
        self.block_size * self.block_size
    }

    pub fn block_count(&self) -> usize {
        self.rows * self.cols
    }

    /// 블록-채널 벡터의 총 개수 (3 × rows × cols)
    pub fn vector_count(&self) -> usize {
        CHANNELS * self.block_count()
    }

    /// 신뢰할 수 없는 크기에서 온 레이아웃용. 오버플로면 None.
    pub fn checked_vector_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)?.checked_mul(CHANNELS)
    }

    /// 블록 내부 오프셋 (x, y) 의 지그재그 인덱스
    ///
    /// 짝수 행은 왼쪽→오른쪽, 홀수 행은 오른쪽→왼쪽.
    #[inline]
    pub fn serpentine_index(&self, x: usize, y: usize) -> usize {
        let row_start = y * self.block_size;
        if y % 2 == 0 {
            row_start + x
        } else {
            row_start + self.block_size - (x + 1)
        }
    }

    /// 한 블록의 R, G, B 벡터. 이미지 밖 픽셀은 0.
    pub fn extract_block<R: Raster + ?Sized>(&self, image: &R, block: usize) -> [DVector<f64>; CHANNELS] {
        let bounds = image.bounds();
        let (row, col) = (block / self.cols, block % self.cols);
        let start_x = col * self.block_size;
        let start_y = row * self.block_size;

        let mut vectors: [DVector<f64>; CHANNELS] =
            std::array::from_fn(|_| DVector::zeros(self.block_len()));

        for y in 0..self.block_size {
            if start_y + y >= self.height {
                break;
            }
            for x in 0..self.block_size {
                if start_x + x >= self.width {
                    break;
                }
                let px = image.rgba16(
                    bounds.min_x + (start_x + x) as u32,
                    bounds.min_y + (start_y + y) as u32,
                );
                let idx = self.serpentine_index(x, y);
                for (channel, vector) in vectors.iter_mut().enumerate() {
                    vector[idx] = px[channel] as f64 / u16::MAX as f64;
                }
            }
        }

        vectors
    }
}

/// 이미지의 모든 블록-채널 벡터를 추출 (블록 단위 병렬)
pub fn extract_blocks<R: Raster + Sync + ?Sized>(image: &R, block_size: usize) -> (BlockLayout, Vec<DVector<f64>>) {
    let bounds = image.bounds();
    let layout = BlockLayout::new(block_size, bounds.width as usize, bounds.height as usize);

    let per_block: Vec<[DVector<f64>; CHANNELS]> = (0..layout.block_count())
        .into_par_iter()
        .map(|block| layout.extract_block(image, block))
        .collect();

    let vectors = per_block.into_iter().flatten().collect();
    (layout, vectors)
}

/// 블록-채널 벡터로부터 원래 크기의 8비트 RGBA 이미지를 재구성
///
/// 채널 값은 [0, 1] 로 잘린 뒤 0..=255 로 반올림되고 알파는 항상 255.
/// 벡터 개수나 길이가 레이아웃과 맞지 않으면 에러.
pub fn assemble_image(layout: &BlockLayout, vectors: &[DVector<f64>]) -> Result<RgbaImage, ValidationError> {
    if vectors.len() != layout.vector_count() {
        return Err(ValidationError::BlockCountMismatch {
            expected: layout.vector_count(),
            actual: vectors.len(),
        });
    }
    if let Some((block, vector)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != layout.block_len())
    {
        return Err(ValidationError::CoefficientLength {
            block,
            expected: layout.block_len(),
            actual: vector.len(),
        });
    }

    let mut res = RgbaImage::new(layout.width as u32, layout.height as u32);
    for (x, y, px) in res.enumerate_pixels_mut() {
        let (x, y) = (x as usize, y as usize);
        let block = (y / layout.block_size) * layout.cols + x / layout.block_size;
        let idx = layout.serpentine_index(x % layout.block_size, y % layout.block_size);
        let channels = &vectors[block * CHANNELS..(block + 1) * CHANNELS];
        *px = Rgba([
            to_u8(channels[0][idx]),
            to_u8(channels[1][idx]),
            to_u8(channels[2][idx]),
            u8::MAX,
        ]);
    }
    Ok(res)
}

#[inline]
fn to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * u8::MAX as f64).round() as u8
}
