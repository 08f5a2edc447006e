//! 기저 방향 중요도 순위
//!
//! 이미지 전체(모든 블록, 모든 채널)의 정확해 계수 절댓값을 방향별로 합산하고,
//! 중요도 내림차순 상위 k 개를 오름차순으로 정렬해 유지 집합을 만듭니다.


use nalgebra::DVector;
use rayon::prelude::*;

/// 방향 인덱스별 누적 계수 크기 (한 이미지 기준)
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceTable {
    scores: Vec<f64>,
}

impl ImportanceTable {
    const CHUNK: usize = 64;

    pub fn zeros(dimension: usize) -> Self {
        Self {
            scores: vec![0.0; dimension],
        }
    }

    /// 청크별 부분합을 병렬로 만든(map) 뒤 순서대로 합치는(fold) 전역 누적
    ///
    /// 청크 경계가 고정되어 있어 합산 순서, 즉 결과가 실행마다 같다.
    pub fn accumulate(dimension: usize, coefficients: &[DVector<f64>]) -> Self {
        coefficients
            .par_chunks(Self::CHUNK)
            .map(|chunk| {
                let mut table = Self::zeros(dimension);
                for coeffs in chunk {
                    table.add(coeffs);
                }
                table
            })
            .collect::<Vec<_>>()
            .into_iter()
            .fold(Self::zeros(dimension), Self::merge)
    }

    /// 한 블록-채널의 계수 절댓값을 더함
    pub fn add(&mut self, coefficients: &DVector<f64>) {
        for (score, coeff) in self.scores.iter_mut().zip(coefficients.iter()) {
            *score += coeff.abs();
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        for (score, theirs) in self.scores.iter_mut().zip(other.scores) {
            *score += theirs;
        }
        self
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn dimension(&self) -> usize {
        self.scores.len()
    }

    /// (인덱스, 점수) 쌍을 점수 내림차순으로. 동점 순서는 보장하지 않음.
    pub fn ranked(&self) -> Vec<(usize, f64)> {
        let mut pairs: Vec<(usize, f64)> = self.scores.iter().copied().enumerate().collect();
        pairs.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    /// 상위 k 개 방향을 오름차순으로 (직렬화되는 정규 순서)
    pub fn select_retained(&self, count: usize) -> Vec<usize> {
        let mut retained: Vec<usize> = self
            .ranked()
            .into_iter()
            .take(count)
            .map(|(index, _)| index)
            .collect();
        retained.sort_unstable();
        retained
    }
}

/// k = round(quality × N), N 을 넘지 않음
pub fn retained_count(quality: f64, dimension: usize) -> usize {
    let count = (quality * dimension as f64).round();
    if count <= 0.0 {
        0
    } else {
        (count as usize).min(dimension)
    }
}
