/**
* filename : signal_types
* author : HAMA
* date: 2025. 6. 6.
* description:
**/

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::math::clamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
  StrongBuy,       // 강한 매수 (종합 신호 전용)
  Buy,             // 매수
  Neutral,         // 중립
  Sell,            // 매도
  StrongSell,      // 강한 매도 (종합 신호 전용)
}

impl Signal {
  // 신호가 매수 방향인지 확인
  pub fn is_buy(&self) -> bool {
    matches!(self, Signal::Buy | Signal::StrongBuy)
  }

  // 신호가 매도 방향인지 확인
  pub fn is_sell(&self) -> bool {
    matches!(self, Signal::Sell | Signal::StrongSell)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Signal::StrongBuy => "strong_buy",
      Signal::Buy => "buy",
      Signal::Neutral => "neutral",
      Signal::Sell => "sell",
      Signal::StrongSell => "strong_sell",
    }
  }

  /// 사용자에게 보여줄 추천 문구
  pub fn recommendation(&self) -> &'static str {
    match self {
      Signal::StrongBuy => "Strong buy - multiple indicators are signalling a buy.",
      Signal::Buy => "Buy - technical indicators are positive.",
      Signal::Neutral => "Neutral - no clear direction. Waiting is recommended.",
      Signal::Sell => "Sell - technical indicators are negative.",
      Signal::StrongSell => "Strong sell - multiple indicators are signalling a sell.",
    }
  }
}

impl Default for Signal {
  fn default() -> Self {
    Signal::Neutral
  }
}

impl fmt::Display for Signal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSignal {
  pub composite: Signal,
  pub individual: BTreeMap<String, Signal>,
  pub buy_count: usize,
  pub sell_count: usize,
  pub timestamp: DateTime<Utc>,
}

impl CompositeSignal {
  /// 신뢰도 (0 ~ 100)
  ///
  /// 매수/매도 표가 하나도 없으면 0. 그 외에는 강한 신호 80, 일반 신호 60,
  /// 중립 40에 max(buy, sell) / 4 * 20을 더하고 100으로 제한합니다.
  pub fn confidence(&self) -> f64 {
    if self.buy_count + self.sell_count == 0 {
      return 0.0;
    }

    let base = match self.composite {
      Signal::StrongBuy | Signal::StrongSell => 80.0,
      Signal::Buy | Signal::Sell => 60.0,
      Signal::Neutral => 40.0,
    };

    let consistency_bonus = self.buy_count.max(self.sell_count) as f64 / 4.0 * 20.0;

    clamp(base + consistency_bonus, 0.0, 100.0)
  }

  pub fn recommendation(&self) -> &'static str {
    self.composite.recommendation()
  }
}
