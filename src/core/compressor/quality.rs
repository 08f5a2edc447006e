//! 복원 품질 측정 (RMSE / PSNR / 압축률)

use crate::core::blocks::Raster;
use image::RgbaImage;

/// 8비트 채널 기준 최대값
const PEAK: f64 = 255.0;

/// 두 시퀀스의 RMSE. 길이가 다르거나 비어 있으면 NaN.
pub fn rmse(reference: &[f64], approximation: &[f64]) -> f64 {
    if reference.len() != approximation.len() || reference.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = reference
        .iter()
        .zip(approximation)
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    (sum / reference.len() as f64).sqrt()
}

/// 8비트 RMSE 로부터 PSNR (dB). 오차가 0 이면 무한대.
pub fn psnr(rmse: f64) -> f64 {
    if rmse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (PEAK / rmse).log10()
    }
}

/// 압축 결과 통계
#[derive(Debug, Clone, PartialEq)]
pub struct QualityStats {
    pub rmse: f64,
    pub psnr: f64,
    /// 유지된 기저 수 k
    pub retained: usize,
    /// 기저 크기 N
    pub basis_size: usize,
    pub compressed_bytes: usize,
    /// 원본 RGB 8비트 크기
    pub raw_bytes: usize,
    pub compression_ratio: f64,
}

impl QualityStats {
    /// 원본(16비트 채널을 8비트로 반올림)과 복원 이미지의 RGB 채널 비교
    pub fn measure<R: Raster + ?Sized>(
        original: &R,
        reconstructed: &RgbaImage,
        compressed_bytes: usize,
        retained: usize,
        basis_size: usize,
    ) -> Self {
        let bounds = original.bounds();
        let mut reference = Vec::with_capacity(bounds.width as usize * bounds.height as usize * 3);
        let mut approximation = Vec::with_capacity(reference.capacity());

        for y in 0..bounds.height.min(reconstructed.height()) {
            for x in 0..bounds.width.min(reconstructed.width()) {
                let source = original.rgba16(bounds.min_x + x, bounds.min_y + y);
                let decoded = reconstructed.get_pixel(x, y);
                for channel in 0..3 {
                    reference.push((source[channel] as f64 / 257.0).round());
                    approximation.push(decoded[channel] as f64);
                }
            }
        }

        let rmse = rmse(&reference, &approximation);
        let raw_bytes = bounds.width as usize * bounds.height as usize * 3;
        let compression_ratio = if compressed_bytes == 0 {
            0.0
        } else {
            raw_bytes as f64 / compressed_bytes as f64
        };

        Self {
            rmse,
            psnr: psnr(rmse),
            retained,
            basis_size,
            compressed_bytes,
            raw_bytes,
            compression_ratio,
        }
    }

    /// 품질 보고서 출력
    pub fn print_report(&self) {
        println!("=== 압축 품질 보고서 ===");
        println!("유지 기저: {}/{}", self.retained, self.basis_size);
        println!("RMSE: {:.4}", self.rmse);
        println!("PSNR: {:.2} dB", self.psnr);
        println!("원본 크기: {:.2} KB", self.raw_bytes as f64 / 1024.0);
        println!("압축 크기: {:.2} KB", self.compressed_bytes as f64 / 1024.0);
        println!("압축률: {:.2}:1", self.compression_ratio);
    }
}
