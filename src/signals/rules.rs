/**
* filename : rules
* author : HAMA
* date: 2025. 6. 6.
* description: 지표별 매매 신호 규칙
**/

use crate::config::SignalConfig;
use super::signal_types::Signal;

// RSI: 과매도 매수, 과매수 매도
pub fn rsi_signal(rsi: Option<f64>, config: &SignalConfig) -> Signal {
  match rsi {
    Some(v) if v < config.rsi_oversold => Signal::Buy,
    Some(v) if v > config.rsi_overbought => Signal::Sell,
    _ => Signal::Neutral,
  }
}

/// MACD 교차 신호
///
/// 골든 크로스(직전 MACD <= 직전 시그널, 현재 MACD > 현재 시그널)는 매수,
/// 데드 크로스는 매도. 값이 하나라도 없으면 중립.
pub fn macd_signal(
  macd: Option<f64>,
  signal: Option<f64>,
  prev_macd: Option<f64>,
  prev_signal: Option<f64>,
) -> Signal {
  let (Some(m), Some(s), Some(pm), Some(ps)) = (macd, signal, prev_macd, prev_signal) else {
    return Signal::Neutral;
  };

  if pm <= ps && m > s {
    Signal::Buy
  } else if pm >= ps && m < s {
    Signal::Sell
  } else {
    Signal::Neutral
  }
}

// 볼린저: 하단 터치 매수, 상단 터치 매도
pub fn bollinger_signal(
  price: Option<f64>,
  upper: Option<f64>,
  lower: Option<f64>,
  middle: Option<f64>,
) -> Signal {
  let (Some(price), Some(upper), Some(lower), Some(_)) = (price, upper, lower, middle) else {
    return Signal::Neutral;
  };

  if price <= lower {
    Signal::Buy
  } else if price >= upper {
    Signal::Sell
  } else {
    Signal::Neutral
  }
}

// 스토캐스틱: %K, %D 모두 과매도/과매수 구간일 때만
pub fn stochastic_signal(k: Option<f64>, d: Option<f64>, config: &SignalConfig) -> Signal {
  let (Some(k), Some(d)) = (k, d) else {
    return Signal::Neutral;
  };

  if k < config.stochastic_oversold && d < config.stochastic_oversold {
    Signal::Buy
  } else if k > config.stochastic_overbought && d > config.stochastic_overbought {
    Signal::Sell
  } else {
    Signal::Neutral
  }
}

/// 지표 이름으로 신호 계산
///
/// 값 순서: rsi `[rsi]`, macd `[macd, signal, prev_macd, prev_signal]`,
/// bollinger `[price, upper, lower, middle]`, stochastic `[k, d]`.
/// 알 수 없는 이름이거나 값 개수가 맞지 않으면 중립.
pub fn signal_for(name: &str, values: &[Option<f64>], config: &SignalConfig) -> Signal {
  match (name.trim().to_lowercase().as_str(), values) {
    ("rsi", [rsi]) => rsi_signal(*rsi, config),
    ("macd", [m, s, pm, ps]) => macd_signal(*m, *s, *pm, *ps),
    ("bollinger" | "bb", [price, upper, lower, middle]) => bollinger_signal(*price, *upper, *lower, *middle),
    ("stochastic" | "stoch", [k, d]) => stochastic_signal(*k, *d, config),
    (other, values) => {
      log::warn!("신호 계산 불가: {} (값 {}개), 중립 처리", other, values.len());
      Signal::Neutral
    }
  }
}
