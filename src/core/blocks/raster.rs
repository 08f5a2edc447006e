//! 읽기 전용 래스터 추상화
//!
//! 압축기는 원점/크기와 16비트 RGBA 채널 값만 필요로 합니다.

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, Rgba, RgbaImage};

/// 16비트 RGBA 버퍼
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// 래스터의 영역 (원점 + 크기)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(min_x: u32, min_y: u32, width: u32, height: u32) -> Self {
        Self { min_x, min_y, width, height }
    }

    /// 원점이 (0, 0) 인 영역
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn max_x(&self) -> u32 {
        self.min_x.saturating_add(self.width)
    }

    pub fn max_y(&self) -> u32 {
        self.min_y.saturating_add(self.height)
    }
}

/// 픽셀 좌표는 bounds() 안의 절대 좌표, 채널 범위는 0..=65535
pub trait Raster {
    fn bounds(&self) -> Bounds;
    fn rgba16(&self, x: u32, y: u32) -> [u16; 4];
}

impl<R: Raster + ?Sized> Raster for &R {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        (**self).rgba16(x, y)
    }
}

#[inline]
fn widen(channel: u8) -> u16 {
    // 0xff * 0x101 = 0xffff
    channel as u16 * 0x101
}

#[inline]
fn quantize(channel: f32) -> u16 {
    (channel.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

impl Raster for RgbaImage {
    fn bounds(&self) -> Bounds {
        Bounds::sized(self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        self.get_pixel(x, y).0.map(widen)
    }
}

impl Raster for Rgba16Image {
    fn bounds(&self) -> Bounds {
        Bounds::sized(self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        self.get_pixel(x, y).0
    }
}

impl Raster for DynamicImage {
    fn bounds(&self) -> Bounds {
        Bounds::sized(self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        // 16비트/부동소수 버퍼는 8비트를 거치지 않고 읽음
        match self {
            DynamicImage::ImageRgba16(buffer) => buffer.rgba16(x, y),
            DynamicImage::ImageRgb16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
            DynamicImage::ImageLuma16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
            DynamicImage::ImageLumaA16(buffer) => buffer.get_pixel(x, y).to_rgba().0,
            DynamicImage::ImageRgb32F(buffer) => buffer.get_pixel(x, y).to_rgba().0.map(quantize),
            DynamicImage::ImageRgba32F(buffer) => buffer.get_pixel(x, y).0.map(quantize),
            _ => GenericImageView::get_pixel(self, x, y).0.map(widen),
        }
    }
}

/// 다른 래스터의 일부 영역을 원래 좌표계 그대로 노출하는 뷰
#[derive(Debug, Clone, Copy)]
pub struct Viewport<R> {
    inner: R,
    bounds: Bounds,
}

impl<R: Raster> Viewport<R> {
    /// 영역을 inner 의 bounds 안으로 잘라냄
    pub fn new(inner: R, bounds: Bounds) -> Self {
        let outer = inner.bounds();
        let min_x = bounds.min_x.clamp(outer.min_x, outer.max_x());
        let min_y = bounds.min_y.clamp(outer.min_y, outer.max_y());
        let max_x = bounds.max_x().clamp(min_x, outer.max_x());
        let max_y = bounds.max_y().clamp(min_y, outer.max_y());
        Self {
            inner,
            bounds: Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y),
        }
    }
}

impl<R: Raster> Raster for Viewport<R> {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        self.inner.rgba16(x, y)
    }
}
