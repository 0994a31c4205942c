/**
* filename : moving_averages
* author : HAMA
* date: 2025. 6. 3.
* description: 단순/지수 이동평균
**/

use crate::error::IndicatorError;
use super::utils::{absent, ensure_period, round_series};
use super::IndicatorSeries;

/// 단순 이동평균 (Simple Moving Average)
///
/// 인덱스 `period-1`부터 직전 `period`개 값의 산술 평균, 그 이전은 비어 있음.
pub fn sma(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
  ensure_period("SMA", period)?;
  Ok(round_series(sma_raw(prices, period)))
}

/// 지수 이동평균 (Exponential Moving Average)
///
/// 첫 값은 처음 `period`개 가격의 SMA이며 인덱스 `period-1`에 놓입니다.
/// 이후 `ema[i] = price[i] * k + ema[i-1] * (1 - k)`, `k = 2 / (period + 1)`.
pub fn ema(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
  ensure_period("EMA", period)?;
  Ok(round_series(ema_raw(prices, period)))
}

// 반올림 전 SMA (다른 지표의 중간 계산용)
pub(crate) fn sma_raw(prices: &[f64], period: usize) -> IndicatorSeries {
  let n = prices.len();
  if period == 0 || n < period {
    return absent(n);
  }

  let mut out = absent(n);
  for i in (period - 1)..n {
    let window = &prices[i + 1 - period..=i];
    out[i] = Some(window.iter().sum::<f64>() / period as f64);
  }
  out
}

// 반올림 전 EMA, 재귀식은 전체 정밀도로 유지
pub(crate) fn ema_raw(prices: &[f64], period: usize) -> IndicatorSeries {
  let n = prices.len();
  if period == 0 || n < period {
    return absent(n);
  }

  let alpha = 2.0 / (period as f64 + 1.0);
  let mut out = absent(n);

  let mut current = prices[..period].iter().sum::<f64>() / period as f64;
  out[period - 1] = Some(current);

  for i in period..n {
    current = prices[i] * alpha + current * (1.0 - alpha);
    out[i] = Some(current);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[test]
  fn test_sma_basic() {
    let result = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
    assert_eq!(result, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
  }

  #[test]
  fn test_sma_short_input_is_all_absent() {
    let result = sma(&[1.0, 2.0], 3).unwrap();
    assert_eq!(result, vec![None, None]);
  }

  #[test]
  fn test_zero_period_rejected() {
    assert!(matches!(sma(&[1.0], 0), Err(IndicatorError::InvalidParameter(_))));
    assert!(matches!(ema(&[1.0], 0), Err(IndicatorError::InvalidParameter(_))));
  }

  #[test]
  fn test_ema_seed_and_recurrence() {
    // period 3: k = 0.5, 시드 = (1+2+3)/3 = 2
    let result = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
    assert_eq!(result[0], None);
    assert_eq!(result[1], None);
    assert_eq!(result[2], Some(2.0));
    assert_eq!(result[3], Some(3.0)); // 4*0.5 + 2*0.5
    assert_eq!(result[4], Some(4.0)); // 5*0.5 + 3*0.5
  }

  #[test]
  fn test_ema_keeps_full_precision_between_steps() {
    let prices = [10.0, 10.0, 10.0, 10.333, 10.333, 10.333];
    let raw = ema_raw(&prices, 3);
    let rounded = ema(&prices, 3).unwrap();

    // 반올림은 출력에만 적용됨
    let last = raw[5].unwrap();
    assert!((rounded[5].unwrap() - (last * 100.0).round() / 100.0).abs() < 1e-12);
    assert!((last - 10.29137).abs() < 1e-4);
  }

  #[rstest]
  #[case(1)]
  #[case(4)]
  #[case(10)]
  fn test_sma_absence_prefix(#[case] period: usize) {
    let prices: Vec<f64> = (0..25).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
    let result = sma(&prices, period).unwrap();

    assert_eq!(result.len(), prices.len());
    assert!(result[..period - 1].iter().all(|v| v.is_none()));

    let first_mean = prices[..period].iter().sum::<f64>() / period as f64;
    assert_eq!(result[period - 1], Some((first_mean * 100.0).round() / 100.0));
  }
}
