//! 압축 → 복원 왕복 통합 테스트

use basis_codec::{
    BasisKind, Bounds, CodecError, CompressedImage, Compressor, CompressorConfig, Rgba16Image,
    ValidationError, Viewport,
};
use image::{DynamicImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_image(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |_, _| Rgba([rng.gen(), rng.gen(), rng.gen(), 255]))
}

fn max_channel_error(a: &RgbaImage, b: &RgbaImage) -> u8 {
    a.pixels()
        .zip(b.pixels())
        .flat_map(|(p, q)| (0..3).map(move |c| p[c].abs_diff(q[c])))
        .max()
        .unwrap_or(0)
}

#[test]
fn 최고품질_랜덤이미지_무손실_테스트() {
    init_logger();
    for (block_size, seed) in [(2, 1), (3, 2), (4, 3), (8, 4)] {
        let compressor = Compressor::with_block_size(1.0, block_size).unwrap();
        let image = random_image(17, 11, seed);
        let bytes = compressor.compress(&image).unwrap();
        let restored = compressor.decompress(&bytes).unwrap();

        assert_eq!(restored.dimensions(), (17, 11));
        let err = max_channel_error(&image, &restored);
        assert!(err <= 1, "블록 {} 최대 오차 {}", block_size, err);
        assert!(restored.pixels().all(|p| p[3] == 255));
        println!("✅ 블록 {}: 최대 채널 오차 {}", block_size, err);
    }
}

#[test]
fn 직교기저_무손실_테스트() {
    init_logger();
    let config = CompressorConfig::new(1.0, 4).with_basis(BasisKind::Orthogonal);
    let compressor = Compressor::with_config(config).unwrap();
    let image = random_image(12, 12, 7);
    let restored = compressor.decompress(&compressor.compress(&image).unwrap()).unwrap();
    assert!(max_channel_error(&image, &restored) <= 1);
}

#[test]
fn 블록배수가_아닌_크기_보존_테스트() {
    init_logger();
    let compressor = Compressor::with_block_size(0.5, 16).unwrap();
    for (width, height) in [(1, 1), (15, 17), (33, 5), (16, 16)] {
        let image = random_image(width, height, 9);
        let restored = compressor.decompress(&compressor.compress(&image).unwrap()).unwrap();
        assert_eq!(restored.dimensions(), (width, height));
    }
}

#[test]
fn 유지집합_불변식_테스트() {
    init_logger();
    let image = random_image(20, 20, 11);
    for quality in [0.0, 0.05, 0.33, 0.5, 0.9, 1.0] {
        let compressor = Compressor::with_block_size(quality, 4).unwrap();
        let bytes = compressor.compress(&image).unwrap();
        let record = CompressedImage::decode(&bytes, 4).unwrap();

        let expected = (quality * 16.0).round() as usize;
        assert_eq!(record.retained_basis.len(), expected);
        assert!(record.retained_basis.windows(2).all(|w| w[0] < w[1]));
        assert!(record.retained_basis.iter().all(|&i| i < 16));
        assert!(record.coefficients.iter().all(|c| c.len() == expected));
    }
}

#[test]
fn 품질0_불투명_검정_테스트() {
    init_logger();
    let compressor = Compressor::with_block_size(0.0, 4).unwrap();
    let image = random_image(10, 6, 3);
    let restored = compressor.decompress(&compressor.compress(&image).unwrap()).unwrap();
    assert!(restored.pixels().all(|p| p == &Rgba([0, 0, 0, 255])));
}

#[test]
fn 손상된_유지집합_거부_테스트() {
    init_logger();
    let compressor = Compressor::with_block_size(0.5, 4).unwrap();
    let image = random_image(8, 8, 5);
    let mut record = compressor.compress_record(&image).unwrap();

    record.retained_basis.swap(0, 1);
    let bytes = record.encode().unwrap();
    assert!(matches!(
        compressor.decompress(&bytes),
        Err(CodecError::Validation(ValidationError::UnsortedBasis { .. }))
    ));

    record.retained_basis.swap(0, 1);
    *record.retained_basis.last_mut().unwrap() = 16;
    let bytes = record.encode().unwrap();
    assert!(matches!(
        compressor.decompress(&bytes),
        Err(CodecError::Validation(ValidationError::BasisIndexOutOfRange { index: 16, limit: 16 }))
    ));
}

#[test]
fn 입력_래스터_종류_테스트() {
    init_logger();
    let compressor = Compressor::with_block_size(1.0, 4).unwrap();
    let image = random_image(9, 9, 21);

    let wide = Rgba16Image::from_fn(9, 9, |x, y| {
        Rgba(image.get_pixel(x, y).0.map(|c| c as u16 * 257))
    });
    let dynamic = DynamicImage::ImageRgba8(image.clone());

    let from_u8 = compressor.compress(&image).unwrap();
    let from_u16 = compressor.compress(&wide).unwrap();
    let from_dynamic = compressor.compress(&dynamic).unwrap();
    assert_eq!(from_u8, from_u16);
    assert_eq!(from_u8, from_dynamic);
}

#[test]
fn 뷰포트_원점_압축_테스트() {
    init_logger();
    let compressor = Compressor::with_block_size(1.0, 4).unwrap();
    let image = random_image(20, 20, 13);
    let view = Viewport::new(&image, Bounds::new(5, 7, 6, 9));

    let restored = compressor.decompress(&compressor.compress(&view).unwrap()).unwrap();
    assert_eq!(restored.dimensions(), (6, 9));
    for y in 0..9 {
        for x in 0..6 {
            let want = image.get_pixel(x + 5, y + 7);
            let got = restored.get_pixel(x, y);
            for c in 0..3 {
                assert!(want[c].abs_diff(got[c]) <= 1);
            }
        }
    }
}

#[test]
fn 스레드_공유_압축기_테스트() {
    init_logger();
    let compressor = Arc::new(Compressor::with_block_size(0.6, 4).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|seed| {
            let compressor = Arc::clone(&compressor);
            thread::spawn(move || {
                let image = random_image(16, 12, seed);
                let bytes = compressor.compress(&image).unwrap();
                let restored = compressor.decompress(&bytes).unwrap();
                (bytes, restored.dimensions())
            })
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        let (bytes, dims) = handle.join().unwrap();
        assert_eq!(dims, (16, 12));
        // 같은 입력이면 같은 레코드
        let again = compressor.compress(&random_image(16, 12, seed as u64)).unwrap();
        assert_eq!(bytes, again);
    }
}

#[test]
fn 품질_통계_테스트() {
    init_logger();
    let image = RgbaImage::from_fn(64, 64, |x, y| {
        let v = ((x as f64 / 64.0) * 200.0 + (y as f64 / 64.0) * 50.0) as u8;
        Rgba([v, 255 - v, v / 2, 255])
    });

    let full = Compressor::with_block_size(1.0, 8).unwrap().evaluate(&image).unwrap();
    let pruned = Compressor::with_block_size(0.25, 8).unwrap().evaluate(&image).unwrap();
    full.print_report();
    pruned.print_report();

    assert!(full.psnr > 45.0, "무손실 PSNR {}", full.psnr);
    assert!(pruned.psnr > 25.0, "가지치기 PSNR {}", pruned.psnr);
    assert!(pruned.compressed_bytes < full.compressed_bytes);
    assert_eq!(pruned.retained, 16);
}
