/**
* filename : volume
* author : HAMA
* date: 2025. 6. 4.
* description: 거래량 균형 지표 (OBV)
**/

use crate::error::IndicatorError;
use super::utils::ensure_same_len;
use super::IndicatorSeries;

/// On-Balance Volume
///
/// 첫 값은 첫 거래량, 이후 종가 상승 시 거래량을 더하고 하락 시 빼며 보합이면 유지.
/// 거래량과 종가의 길이가 다르면 InputMismatch.
pub fn obv(volume: &[f64], close: &[f64]) -> Result<IndicatorSeries, IndicatorError> {
  ensure_same_len("volume", volume.len(), "close", close.len())?;

  let Some(&first) = volume.first() else {
    return Ok(Vec::new());
  };

  let mut out = Vec::with_capacity(close.len());
  let mut running = first;
  out.push(Some(running));

  for i in 1..close.len() {
    if close[i] > close[i - 1] {
      running += volume[i];
    } else if close[i] < close[i - 1] {
      running -= volume[i];
    }
    out.push(Some(running));
  }

  Ok(out)
}
