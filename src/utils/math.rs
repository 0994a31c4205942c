//! 수학 관련 유틸리티
//!
//! 반올림, 범위 제한, 상대 오차 계산 함수 제공

/// 값을 범위 내로 제한
pub fn clamp(value: f64, min_value: f64, max_value: f64) -> f64 {
  value.max(min_value).min(max_value)
}

/// 소수점 자릿수 반올림 (0.5는 0에서 멀어지는 방향)
pub fn round_to(value: f64, decimals: u32) -> f64 {
  let factor = 10f64.powi(decimals as i32);
  (value * factor).round() / factor
}

/// 표시용 소수점 둘째 자리 반올림
pub fn round2(value: f64) -> f64 {
  round_to(value, 2)
}

/// 기준값 대비 상대 차이, 기준값이 0이면 동일한 경우만 0
pub fn relative_diff(value: f64, reference: f64) -> f64 {
  if reference == 0.0 {
    if value == 0.0 { 0.0 } else { f64::INFINITY }
  } else {
    ((value - reference) / reference).abs()
  }
}
