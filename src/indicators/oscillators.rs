/**
* filename : oscillators
* author : HAMA
* date: 2025. 6. 3.
* description: RSI, 스토캐스틱
**/

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use super::moving_averages::sma_raw;
use super::utils::{absent, compact_defined, ensure_period, ensure_same_len, round_series, scatter};
use super::IndicatorSeries;

/// 상대강도지수 (Relative Strength Index)
///
/// 첫 `period`개 가격 변화의 단순 평균으로 시작해 Wilder 스무딩으로 갱신합니다.
/// 첫 값은 인덱스 `period`에 위치하며, 평균 하락폭이 0이면 100입니다.
pub fn rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
  ensure_period("RSI", period)?;

  let n = prices.len();
  if n < period + 1 {
    return Ok(absent(n));
  }

  let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
  let gains: Vec<f64> = changes.iter().map(|c| if *c > 0.0 { *c } else { 0.0 }).collect();
  let losses: Vec<f64> = changes.iter().map(|c| if *c < 0.0 { -*c } else { 0.0 }).collect();

  let p = period as f64;
  let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
  let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

  let mut out = absent(n);
  out[period] = Some(rsi_value(avg_gain, avg_loss));

  // changes[i]는 prices[i+1]의 변화량
  for i in period..changes.len() {
    avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
    avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
    out[i + 1] = Some(rsi_value(avg_gain, avg_loss));
  }

  Ok(round_series(out))
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
  if avg_loss == 0.0 {
    return 100.0;
  }
  let rs = avg_gain / avg_loss;
  100.0 - (100.0 / (1.0 + rs))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticResult {
  pub percent_k: IndicatorSeries,
  pub percent_d: IndicatorSeries,
}

/// 스토캐스틱 오실레이터
///
/// raw %K = (종가 - 기간 최저가) / (기간 최고가 - 기간 최저가) * 100,
/// 기간 내 고가와 저가가 같으면 50. %K는 raw %K의 SMA(smooth_k),
/// %D는 %K의 SMA(smooth_d)이며 둘 다 값이 있는 구간에서만 계산한 뒤
/// 원래 인덱스로 되돌립니다.
pub fn stochastic(
  high: &[f64],
  low: &[f64],
  close: &[f64],
  period: usize,
  smooth_k: usize,
  smooth_d: usize,
) -> Result<StochasticResult, IndicatorError> {
  ensure_period("Stochastic", period)?;
  ensure_period("Stochastic %K smoothing", smooth_k)?;
  ensure_period("Stochastic %D smoothing", smooth_d)?;
  ensure_same_len("high", high.len(), "close", close.len())?;
  ensure_same_len("low", low.len(), "close", close.len())?;

  let n = close.len();
  if n < period {
    return Ok(StochasticResult {
      percent_k: absent(n),
      percent_d: absent(n),
    });
  }

  let raw_k = raw_percent_k(high, low, close, period);

  let (raw_values, raw_idx) = compact_defined(&raw_k);
  let percent_k = scatter(n, &raw_idx, &sma_raw(&raw_values, smooth_k));

  let (k_values, k_idx) = compact_defined(&percent_k);
  let percent_d = scatter(n, &k_idx, &sma_raw(&k_values, smooth_d));

  Ok(StochasticResult {
    percent_k: round_series(percent_k),
    percent_d: round_series(percent_d),
  })
}

pub(crate) fn raw_percent_k(high: &[f64], low: &[f64], close: &[f64], period: usize) -> IndicatorSeries {
  let n = close.len();
  let mut out = absent(n);
  if period == 0 || n < period {
    return out;
  }

  for i in (period - 1)..n {
    let start = i + 1 - period;
    let highest = high[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = low[start..=i].iter().copied().fold(f64::INFINITY, f64::min);

    out[i] = Some(if highest != lowest {
      (close[i] - lowest) / (highest - lowest) * 100.0
    } else {
      50.0
    });
  }
  out
}
