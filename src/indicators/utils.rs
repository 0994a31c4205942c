/**
* filename : utils
* author : HAMA
* date: 2025. 6. 3.
* description:
**/

use crate::error::IndicatorError;
use crate::utils::math::round2;
use super::IndicatorSeries;

// 길이 n의 빈 시리즈
pub fn absent(n: usize) -> IndicatorSeries {
  vec![None; n]
}

pub fn ensure_period(name: &str, period: usize) -> Result<(), IndicatorError> {
  if period == 0 {
    log::warn!("{}: period must be positive", name);
    return Err(IndicatorError::InvalidParameter(format!("{} period must be positive", name)));
  }
  Ok(())
}

pub fn ensure_same_len(
  left: &'static str,
  left_len: usize,
  right: &'static str,
  right_len: usize,
) -> Result<(), IndicatorError> {
  if left_len != right_len {
    log::warn!("입력 길이 불일치: {}={} {}={}", left, left_len, right, right_len);
    return Err(IndicatorError::mismatch(left, left_len, right, right_len));
  }
  Ok(())
}

/// 값이 있는 위치만 추려내고 원래 인덱스를 함께 반환
pub fn compact_defined(series: &[Option<f64>]) -> (Vec<f64>, Vec<usize>) {
  series
    .iter()
    .enumerate()
    .filter_map(|(i, v)| v.map(|v| (v, i)))
    .unzip()
}

/// 압축된 구간에서 계산한 결과를 원래 인덱스 위치로 되돌림
///
/// `values[j]`는 `indices[j]`에 놓이고, 나머지 위치는 모두 비어 있습니다.
pub fn scatter(len: usize, indices: &[usize], values: &[Option<f64>]) -> IndicatorSeries {
  let mut out = absent(len);
  for (&idx, value) in indices.iter().zip(values.iter()) {
    out[idx] = *value;
  }
  out
}

// 출력 직전에만 반올림
pub fn round_series(series: IndicatorSeries) -> IndicatorSeries {
  series.into_iter().map(|v| v.map(round2)).collect()
}
