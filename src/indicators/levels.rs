/**
* filename : levels
* author : HAMA
* date: 2025. 6. 4.
* description: 지지선/저항선 식별
**/

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::utils::math::{relative_diff, round2};
use super::utils::ensure_period;

// 같은 레벨로 묶는 상대 거리 (1%)
const CLUSTER_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
  /// 오름차순
  pub support: Vec<f64>,
  /// 내림차순
  pub resistance: Vec<f64>,
}

/// 지지선과 저항선 식별
///
/// 중심 기준 `2*window+1` 구간의 최댓값과 같은 점은 저항 후보,
/// 최솟값과 같은 점은 지지 후보입니다. 후보는 1% 이내로 인접한 값끼리
/// 묶어 평균으로 대표하고, 1% 이내에 들어오는 후보 수(터치 수)가 많은
/// 순서로 `num_levels`개를 남깁니다.
pub fn support_resistance(
  prices: &[f64],
  window: usize,
  num_levels: usize,
) -> Result<SupportResistance, IndicatorError> {
  ensure_period("Support/Resistance window", window)?;
  ensure_period("Support/Resistance levels", num_levels)?;

  let n = prices.len();
  if n < window * 2 {
    return Ok(SupportResistance::default());
  }

  let mut highs = Vec::new();
  let mut lows = Vec::new();

  for i in window..n.saturating_sub(window) {
    let slice = &prices[i - window..=i + window];
    let max = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = slice.iter().copied().fold(f64::INFINITY, f64::min);

    // 구간 내 변동이 없으면 최댓값 쪽으로 분류
    if prices[i] == max {
      highs.push(prices[i]);
    } else if prices[i] == min {
      lows.push(prices[i]);
    }
  }

  let mut support = cluster_levels(&lows, num_levels);
  let mut resistance = cluster_levels(&highs, num_levels);

  support.sort_by(|a, b| a.total_cmp(b));
  resistance.sort_by(|a, b| b.total_cmp(a));

  Ok(SupportResistance {
    support: support.into_iter().map(round2).collect(),
    resistance: resistance.into_iter().map(round2).collect(),
  })
}

// 인접 후보를 묶고 터치 수 기준으로 상위 레벨 선택
fn cluster_levels(levels: &[f64], num_levels: usize) -> Vec<f64> {
  if levels.is_empty() {
    return Vec::new();
  }

  let mut sorted = levels.to_vec();
  sorted.sort_by(|a, b| a.total_cmp(b));

  let mut clusters: Vec<Vec<f64>> = vec![vec![sorted[0]]];
  for &level in &sorted[1..] {
    // 직전 클러스터의 마지막 값과 비교
    let joins = clusters
      .last()
      .and_then(|c| c.last())
      .map_or(false, |&last| relative_diff(level, last) < CLUSTER_THRESHOLD);

    match clusters.last_mut() {
      Some(cluster) if joins => cluster.push(level),
      _ => clusters.push(vec![level]),
    }
  }

  let mut ranked: Vec<(f64, usize)> = clusters
    .iter()
    .map(|c| {
      let mean = c.iter().sum::<f64>() / c.len() as f64;
      let touches = levels
        .iter()
        .filter(|l| relative_diff(**l, mean) < CLUSTER_THRESHOLD)
        .count();
      (mean, touches)
    })
    .collect();

  // 안정 정렬: 터치 수가 같으면 낮은 가격 순서 유지
  ranked.sort_by(|a, b| b.1.cmp(&a.1));

  ranked.into_iter().take(num_levels).map(|(mean, _)| mean).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  // 주기 10의 삼각파: 최고 110, 최저 100
  fn triangle(n: usize) -> Vec<f64> {
    (0..n)
      .map(|i| {
        let phase = i % 10;
        let offset = if phase <= 5 { phase } else { 10 - phase };
        100.0 + offset as f64 * 2.0
      })
      .collect()
  }

  #[test]
  fn test_short_input_returns_empty() {
    let result = support_resistance(&[1.0, 2.0, 3.0], 2, 5).unwrap();
    assert!(result.support.is_empty());
    assert!(result.resistance.is_empty());
  }

  #[test]
  fn test_triangle_wave_levels() {
    let prices = triangle(60);
    let result = support_resistance(&prices, 3, 5).unwrap();

    assert_eq!(result.resistance, vec![110.0]);
    assert_eq!(result.support, vec![100.0]);
  }

  #[test]
  fn test_nearby_levels_are_clustered() {
    let levels = [100.0, 100.5, 100.8, 120.0, 120.3];
    let clustered = cluster_levels(&levels, 5);

    assert_eq!(clustered.len(), 2);
    // 터치 수가 많은 100 부근 클러스터가 먼저
    assert!((clustered[0] - 100.433).abs() < 1e-2);
    assert!((clustered[1] - 120.15).abs() < 1e-9);
  }

  #[test]
  fn test_level_count_is_capped() {
    let levels = [10.0, 20.0, 30.0, 40.0];
    assert_eq!(cluster_levels(&levels, 2), vec![10.0, 20.0]);
  }

  #[test]
  fn test_ordering_of_output() {
    // 서로 다른 높이의 봉우리와 골짜기
    let mut prices = Vec::new();
    for (peak, trough) in [(150.0, 90.0), (130.0, 80.0), (170.0, 95.0)] {
      prices.extend_from_slice(&[120.0, 120.0, peak, 120.0, 120.0, trough]);
    }
    prices.extend_from_slice(&[120.0, 120.0]);

    let result = support_resistance(&prices, 2, 5).unwrap();
    assert!(result.support.windows(2).all(|w| w[0] <= w[1]));
    assert!(result.resistance.windows(2).all(|w| w[0] >= w[1]));
    assert!(result.resistance.contains(&170.0));
    assert!(result.support.contains(&80.0));
  }
}
