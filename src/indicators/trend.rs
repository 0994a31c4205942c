/**
* filename : trend
* author : HAMA
* date: 2025. 6. 3.
* description: MACD
**/

use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::utils::math::round2;
use super::moving_averages::ema_raw;
use super::utils::{absent, compact_defined, ensure_period, round_series, scatter};
use super::IndicatorSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
  pub macd: IndicatorSeries,
  pub signal: IndicatorSeries,
  pub histogram: IndicatorSeries,
}

impl MacdResult {
  fn empty(n: usize) -> Self {
    MacdResult {
      macd: absent(n),
      signal: absent(n),
      histogram: absent(n),
    }
  }
}

/// MACD (Moving Average Convergence Divergence)
///
/// MACD 라인은 EMA(fast) - EMA(slow), 시그널 라인은 MACD 라인이 정의된
/// 구간만의 EMA(signal)를 원래 인덱스로 되돌린 값입니다.
/// 히스토그램은 표시되는 MACD와 시그널의 차이입니다.
pub fn macd(
  prices: &[f64],
  fast_period: usize,
  slow_period: usize,
  signal_period: usize,
) -> Result<MacdResult, IndicatorError> {
  ensure_period("MACD fast", fast_period)?;
  ensure_period("MACD slow", slow_period)?;
  ensure_period("MACD signal", signal_period)?;

  let n = prices.len();
  if n < slow_period {
    return Ok(MacdResult::empty(n));
  }

  let fast = ema_raw(prices, fast_period);
  let slow = ema_raw(prices, slow_period);

  let macd_line: IndicatorSeries = fast
    .iter()
    .zip(slow.iter())
    .map(|(f, s)| match (f, s) {
      (Some(f), Some(s)) => Some(f - s),
      _ => None,
    })
    .collect();

  let (macd_values, macd_idx) = compact_defined(&macd_line);
  let signal_line = scatter(n, &macd_idx, &ema_raw(&macd_values, signal_period));

  let macd_line = round_series(macd_line);
  let signal_line = round_series(signal_line);

  let histogram = macd_line
    .iter()
    .zip(signal_line.iter())
    .map(|(m, s)| match (m, s) {
      (Some(m), Some(s)) => Some(round2(m - s)),
      _ => None,
    })
    .collect();

  Ok(MacdResult {
    macd: macd_line,
    signal: signal_line,
    histogram,
  })
}
