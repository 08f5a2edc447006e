use super::super::{assemble_image, extract_blocks, BlockLayout, CHANNELS};
use approx::assert_abs_diff_eq;
use image::{Rgba, RgbaImage};

fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8, 255])
    })
}

#[test]
fn 블록_그리드_개수_테스트() {
    let layout = BlockLayout::new(4, 10, 7);
    assert_eq!(layout.cols, 3);
    assert_eq!(layout.rows, 2);
    assert_eq!(layout.block_count(), 6);
    assert_eq!(layout.vector_count(), 18);
    assert_eq!(layout.block_len(), 16);

    let exact = BlockLayout::new(4, 8, 8);
    assert_eq!((exact.rows, exact.cols), (2, 2));

    let empty = BlockLayout::new(4, 0, 5);
    assert_eq!(empty.block_count(), 0);
}

#[test]
fn 지그재그_인덱스_테스트() {
    let layout = BlockLayout::new(3, 3, 3);
    // 짝수 행: 왼쪽 → 오른쪽
    assert_eq!(layout.serpentine_index(0, 0), 0);
    assert_eq!(layout.serpentine_index(2, 0), 2);
    // 홀수 행: 오른쪽 → 왼쪽
    assert_eq!(layout.serpentine_index(2, 1), 3);
    assert_eq!(layout.serpentine_index(0, 1), 5);
    assert_eq!(layout.serpentine_index(0, 2), 6);

    // 모든 오프셋이 서로 다른 인덱스로 매핑되는지
    let mut seen = vec![false; 9];
    for y in 0..3 {
        for x in 0..3 {
            let idx = layout.serpentine_index(x, y);
            assert!(!seen[idx], "인덱스 {} 중복", idx);
            seen[idx] = true;
        }
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn 블록_추출_값_범위_테스트() {
    let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 51, 255]));
    let (layout, vectors) = extract_blocks(&image, 2);
    assert_eq!(layout.vector_count(), 3);
    assert_eq!(vectors.len(), 3);
    for i in 0..4 {
        assert_abs_diff_eq!(vectors[0][i], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vectors[1][i], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vectors[2][i], 0.2, epsilon = 1e-12);
    }
}

#[test]
fn 지그재그_추출_순서_테스트() {
    // 빨강 채널 = x + 10*y
    let image = RgbaImage::from_fn(2, 2, |x, y| Rgba([(x + 10 * y) as u8, 0, 0, 255]));
    let (_, vectors) = extract_blocks(&image, 2);
    let red: Vec<u8> = vectors[0]
        .iter()
        .map(|v| (v * 255.0).round() as u8)
        .collect();
    // (0,0), (1,0), (1,1), (0,1)
    assert_eq!(red, vec![0, 1, 11, 10]);
}

#[test]
fn 부분_블록_제로패딩_테스트() {
    let image = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
    let (layout, vectors) = extract_blocks(&image, 2);
    assert_eq!(layout.block_count(), 4);

    // 오른쪽 아래 블록은 (0,0) 한 픽셀만 이미지 안
    let corner = &vectors[3 * CHANNELS];
    assert_abs_diff_eq!(corner[0], 1.0, epsilon = 1e-12);
    assert_eq!(corner[1], 0.0);
    assert_eq!(corner[2], 0.0);
    assert_eq!(corner[3], 0.0);
}

#[test]
fn 추출_재구성_역변환_테스트() {
    for (width, height, block_size) in [(8, 8, 4), (10, 7, 4), (5, 9, 3), (1, 1, 16)] {
        let image = gradient_image(width, height);
        let (layout, vectors) = extract_blocks(&image, block_size);
        let rebuilt = assemble_image(&layout, &vectors).unwrap();
        assert_eq!(rebuilt.dimensions(), (width, height));
        assert_eq!(rebuilt, image, "{}x{} 블록 {} 재구성 실패", width, height, block_size);
    }
}

#[test]
fn 재구성_클램핑_불투명_테스트() {
    let layout = BlockLayout::new(2, 2, 1);
    let vectors = vec![
        nalgebra::DVector::from_vec(vec![1.7, -0.3, 0.0, 0.0]),
        nalgebra::DVector::from_vec(vec![0.5, 0.0, 0.0, 0.0]),
        nalgebra::DVector::from_vec(vec![f64::NAN, 1.0, 0.0, 0.0]),
    ];
    let image = assemble_image(&layout, &vectors).unwrap();
    assert_eq!(image.dimensions(), (2, 1));
    assert_eq!(image.get_pixel(0, 0), &Rgba([255, 128, 0, 255]));
    assert_eq!(image.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
}

#[test]
fn 재구성_벡터_구조_불일치_거부_테스트() {
    use crate::core::error::ValidationError;
    use nalgebra::DVector;

    let layout = BlockLayout::new(2, 4, 2);
    let mut vectors = vec![DVector::zeros(4); 5];
    assert_eq!(
        assemble_image(&layout, &vectors),
        Err(ValidationError::BlockCountMismatch { expected: 6, actual: 5 })
    );

    vectors.push(DVector::zeros(3));
    assert_eq!(
        assemble_image(&layout, &vectors),
        Err(ValidationError::CoefficientLength { block: 5, expected: 4, actual: 3 })
    );

    vectors[5] = DVector::zeros(4);
    assert_eq!(assemble_image(&layout, &vectors).unwrap().dimensions(), (4, 2));
}
