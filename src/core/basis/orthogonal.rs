//! 재귀 직교 기저
//!
//! A = build(N/2) 가 직교 열을 가진다고 할 때
//! [A -A; A A] 역시 직교 열을 가집니다. build(1) 은 1×1 단위행렬.
//! 결과 열의 노름은 √N 이며 정규화는 호출자 몫입니다.

use crate::core::error::ConfigError;
use nalgebra::DMatrix;

/// 크기가 2의 거듭제곱이 아니면 설정 오류
pub fn orthogonal_basis(size: usize) -> Result<DMatrix<f64>, ConfigError> {
    if !size.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { size });
    }
    Ok(build(size))
}

fn build(size: usize) -> DMatrix<f64> {
    if size == 1 {
        return DMatrix::identity(1, 1);
    }

    let half = size / 2;
    let sub = build(half);
    let negated = -&sub;

    let mut res = DMatrix::<f64>::zeros(size, size);
    res.view_mut((0, 0), (half, half)).copy_from(&sub);
    res.view_mut((half, 0), (half, half)).copy_from(&sub);
    res.view_mut((half, half), (half, half)).copy_from(&sub);
    res.view_mut((0, half), (half, half)).copy_from(&negated);
    res
}
