/**
* filename : volatility
* author : HAMA
* date: 2025. 6. 4.
* description: 볼린저 밴드, ATR
**/

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::IndicatorError;
use crate::utils::math::round2;
use super::moving_averages::sma_raw;
use super::utils::{absent, ensure_period, ensure_same_len, round_series};
use super::IndicatorSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerResult {
  pub upper: IndicatorSeries,
  pub middle: IndicatorSeries,
  pub lower: IndicatorSeries,
  pub bandwidth: IndicatorSeries,
  pub percent_b: IndicatorSeries,
}

/// 볼린저 밴드
///
/// 중간 밴드는 SMA(period), 상/하단은 중간 ± std_dev * 모표준편차.
/// bandwidth = (상단 - 하단) / 중간 * 100, %B = (가격 - 하단) / (상단 - 하단) * 100.
pub fn bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> Result<BollingerResult, IndicatorError> {
  ensure_period("Bollinger", period)?;
  if !(std_dev.is_finite() && std_dev > 0.0) {
    return Err(IndicatorError::InvalidParameter(format!(
      "Bollinger std_dev multiplier must be a positive number, got {}",
      std_dev
    )));
  }

  let n = prices.len();
  let mut result = BollingerResult {
    upper: absent(n),
    middle: absent(n),
    lower: absent(n),
    bandwidth: absent(n),
    percent_b: absent(n),
  };
  if n < period {
    return Ok(result);
  }

  let middle = sma_raw(prices, period);

  for i in (period - 1)..n {
    let Some(mid) = middle[i] else { continue };
    let sd = prices[i + 1 - period..=i].iter().population_std_dev();

    let upper = mid + std_dev * sd;
    let lower = mid - std_dev * sd;

    result.upper[i] = Some(round2(upper));
    result.lower[i] = Some(round2(lower));

    if mid != 0.0 {
      result.bandwidth[i] = Some(round2((upper - lower) / mid * 100.0));
    }
    if upper != lower {
      result.percent_b[i] = Some(round2((prices[i] - lower) / (upper - lower) * 100.0));
    }
  }
  result.middle = round_series(middle);

  Ok(result)
}

/// 평균 진폭 (Average True Range)
///
/// True Range는 인덱스 1부터 max(고가-저가, |고가-전일종가|, |저가-전일종가|).
/// 첫 ATR은 처음 `period`개 TR의 평균으로 인덱스 `period`에 놓이고 이후 Wilder 스무딩.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
  ensure_period("ATR", period)?;
  ensure_same_len("high", high.len(), "close", close.len())?;
  ensure_same_len("low", low.len(), "close", close.len())?;

  let n = close.len();
  if n < period + 1 {
    return Ok(absent(n));
  }

  // true_ranges[j]는 인덱스 j+1의 TR
  let true_ranges: Vec<f64> = (1..n)
    .map(|i| {
      let high_low = high[i] - low[i];
      let high_close = (high[i] - close[i - 1]).abs();
      let low_close = (low[i] - close[i - 1]).abs();
      high_low.max(high_close).max(low_close)
    })
    .collect();

  let p = period as f64;
  let mut current = true_ranges[..period].iter().sum::<f64>() / p;

  let mut out = absent(n);
  out[period] = Some(current);

  for j in period..true_ranges.len() {
    current = (current * (p - 1.0) + true_ranges[j]) / p;
    out[j + 1] = Some(current);
  }

  Ok(round_series(out))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bollinger_flat_prices() {
    let prices = vec![10.0; 5];
    let result = bollinger_bands(&prices, 3, 2.0).unwrap();

    assert_eq!(result.middle[2], Some(10.0));
    assert_eq!(result.upper[2], Some(10.0));
    assert_eq!(result.lower[2], Some(10.0));
    assert_eq!(result.bandwidth[2], Some(0.0));
    // 상단 == 하단이면 %B 없음
    assert_eq!(result.percent_b[2], None);
  }

  #[test]
  fn test_bollinger_known_window() {
    // [2, 4, 6]: 평균 4, 모표준편차 sqrt(8/3)
    let result = bollinger_bands(&[2.0, 4.0, 6.0], 3, 2.0).unwrap();
    let sd = (8.0f64 / 3.0).sqrt();

    assert_eq!(result.middle[2], Some(4.0));
    assert_eq!(result.upper[2], Some(round2(4.0 + 2.0 * sd)));
    assert_eq!(result.lower[2], Some(round2(4.0 - 2.0 * sd)));
    assert_eq!(result.bandwidth[2], Some(round2(4.0 * sd / 4.0 * 100.0)));
    assert_eq!(result.percent_b[2], Some(round2((6.0 - (4.0 - 2.0 * sd)) / (4.0 * sd) * 100.0)));
  }

  #[test]
  fn test_bollinger_zero_middle_has_no_bandwidth() {
    let result = bollinger_bands(&[-1.0, 1.0], 2, 2.0).unwrap();
    assert_eq!(result.middle[1], Some(0.0));
    assert_eq!(result.bandwidth[1], None);
    assert!(result.percent_b[1].is_some());
  }

  #[test]
  fn test_bollinger_negative_multiplier_rejected() {
    assert!(bollinger_bands(&[1.0, 2.0], 2, -1.0).is_err());
    assert!(matches!(
      bollinger_bands(&[1.0, 2.0], 2, 0.0),
      Err(IndicatorError::InvalidParameter(_))
    ));
  }

  #[test]
  fn test_atr_seed_and_smoothing() {
    let high = [11.0, 12.0, 13.0, 14.0];
    let low = [9.0, 10.0, 11.0, 10.0];
    let close = [10.0, 11.0, 12.0, 11.0];

    // TR: idx1 = max(2, 2, 0) = 2, idx2 = max(2, 2, 0) = 2, idx3 = max(4, 2, 2) = 4
    let result = atr(&high, &low, &close, 2).unwrap();
    assert_eq!(result, vec![None, None, Some(2.0), Some(3.0)]);
  }

  #[test]
  fn test_atr_short_input() {
    let result = atr(&[1.0, 2.0], &[0.5, 1.5], &[0.8, 1.8], 2).unwrap();
    assert_eq!(result, vec![None, None]);
  }
}
