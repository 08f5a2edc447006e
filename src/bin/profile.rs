//! 합성 이미지로 압축 품질과 속도를 측정하는 프로파일 도구

use anyhow::{bail, Context, Result};
use basis_codec::{BasisKind, Compressor, CompressorConfig};
use clap::{value_parser, Arg, Command};
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// 잡음 진폭은 [0, 1] 범위의 유한한 값
fn parse_noise(value: &str) -> std::result::Result<f64, String> {
    let noise: f64 = value.parse().map_err(|e| format!("{}: {}", value, e))?;
    if (0.0..=1.0).contains(&noise) {
        Ok(noise)
    } else {
        Err(format!("잡음 진폭은 0..=1 이어야 합니다: {}", noise))
    }
}

fn synthetic_image(width: u32, height: u32, noise: f64, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |x, y| {
        let fx = x as f64 / width as f64;
        let fy = y as f64 / height as f64;
        let base = [
            0.5 + 0.5 * (fx * 9.0).sin() * (fy * 4.0).cos(),
            fx * 0.7 + fy * 0.3,
            0.5 + 0.5 * ((fx - 0.5).hypot(fy - 0.5) * 20.0).cos(),
        ];
        let mut px = [0u8; 4];
        for (channel, value) in base.iter().enumerate() {
            let jitter = if noise > 0.0 { rng.gen_range(-noise..noise) } else { 0.0 };
            px[channel] = ((value + jitter).clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        px[3] = 255;
        Rgba(px)
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("basis-codec profile")
        .version("0.1.0")
        .about("기저 가지치기 압축 프로파일러")
        .arg(
            Arg::new("width")
                .long("width")
                .value_parser(value_parser!(u32))
                .default_value("256")
                .help("합성 이미지 너비"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_parser(value_parser!(u32))
                .default_value("256")
                .help("합성 이미지 높이"),
        )
        .arg(
            Arg::new("block-size")
                .long("block-size")
                .short('b')
                .value_parser(value_parser!(usize))
                .default_value("8")
                .help("블록 크기"),
        )
        .arg(
            Arg::new("quality")
                .long("quality")
                .short('q')
                .value_parser(value_parser!(f64))
                .num_args(1..)
                .default_values(["0.1", "0.25", "0.5", "1.0"])
                .help("유지할 기저 비율 (여러 개 지정 가능)"),
        )
        .arg(
            Arg::new("basis")
                .long("basis")
                .value_parser(["trig", "ortho"])
                .default_value("trig")
                .help("기저 종류"),
        )
        .arg(
            Arg::new("noise")
                .long("noise")
                .value_parser(parse_noise)
                .default_value("0.02")
                .help("픽셀 잡음 진폭 (0..1)"),
        )
        .get_matches();

    let width = *matches.get_one::<u32>("width").context("width")?;
    let height = *matches.get_one::<u32>("height").context("height")?;
    let block_size = *matches.get_one::<usize>("block-size").context("block-size")?;
    let noise = *matches.get_one::<f64>("noise").context("noise")?;
    let basis = match matches.get_one::<String>("basis").map(String::as_str) {
        Some("ortho") => BasisKind::Orthogonal,
        Some("trig") | None => BasisKind::Trigonometric,
        Some(other) => bail!("알 수 없는 기저: {}", other),
    };
    let qualities: Vec<f64> = matches
        .get_many::<f64>("quality")
        .context("quality")?
        .copied()
        .collect();

    println!("\n=== 기저 가지치기 압축 프로파일 ===\n");
    println!("이미지: {}x{}, 블록: {}x{}, 기저: {:?}", width, height, block_size, block_size, basis);

    let image = synthetic_image(width, height, noise, 42);

    for quality in qualities {
        let config = CompressorConfig::new(quality, block_size).with_basis(basis);
        let compressor = Compressor::with_config(config)
            .with_context(|| format!("압축기 생성 실패 (quality {})", quality))?;

        let start = Instant::now();
        let bytes = compressor.compress(&image)?;
        let compress_time = start.elapsed();

        let start = Instant::now();
        compressor.decompress(&bytes)?;
        let decompress_time = start.elapsed();

        let stats = compressor.evaluate(&image)?;

        println!("\n--- quality {:.2} ---", quality);
        println!("압축 시간: {:.2} ms", compress_time.as_secs_f64() * 1000.0);
        println!("복원 시간: {:.2} ms", decompress_time.as_secs_f64() * 1000.0);
        stats.print_report();
    }

    Ok(())
}
