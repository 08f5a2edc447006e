//! 삼각함수 기저
//!
//! i ∈ [0, N/2) 에 대해 freq = (i+1)·2π/N 으로
//! 열 2i 에 cos(j·freq), 열 2i+1 에 sin(j·freq) 를 채운 뒤
//! 마지막 열을 DC(모두 1) 벡터로 덮어씁니다.
//!
//! 홀수 N 에서도 쌍 루프가 쓰는 가장 큰 열은 N-2 이므로
//! 범위를 벗어나는 쓰기는 없고, DC 열이 기저를 완성합니다.

use super::normalize_columns;
use nalgebra::DMatrix;
use std::f64::consts::PI;

/// 열이 정규화된 N×N 삼각함수 기저
pub fn trigonometric_basis(size: usize) -> DMatrix<f64> {
    let mut basis = DMatrix::<f64>::zeros(size, size);

    for i in 0..size / 2 {
        let freq = (i + 1) as f64 * 2.0 * PI / size as f64;
        for j in 0..size {
            let argument = j as f64 * freq;
            basis[(j, 2 * i)] = argument.cos();
            basis[(j, 2 * i + 1)] = argument.sin();
        }
    }

    // 짝수 N 에서 마지막 sin 열은 sin(jπ) = 0 이므로 DC 로 교체
    if size > 0 {
        basis.column_mut(size - 1).fill(1.0);
    }

    normalize_columns(&mut basis);
    basis
}
