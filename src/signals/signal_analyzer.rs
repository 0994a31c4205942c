/**
* filename : signal_analyzer
* author : HAMA
* date: 2025. 6. 6.
* description: 지표 최신값 → 종합 매매 신호
**/

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::SignalConfig;
use crate::indicators::IndicatorBundle;
use super::rules::{bollinger_signal, macd_signal, rsi_signal, stochastic_signal};
use super::signal_types::{CompositeSignal, Signal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdInput {
  pub macd: Option<f64>,
  pub signal: Option<f64>,
  pub prev_macd: Option<f64>,
  pub prev_signal: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerInput {
  pub upper: Option<f64>,
  pub lower: Option<f64>,
  pub middle: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticInput {
  pub k: Option<f64>,
  pub d: Option<f64>,
}

/// 종합 신호 입력
///
/// 바깥 Option은 해당 지표를 계산했는지, 안쪽 값의 None은 계산했지만
/// 최신 값이 없는 경우입니다. 계산하지 않은 지표는 신호 목록에서 빠지고,
/// 값이 없는 지표는 중립으로 들어갑니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestValues {
  pub price: Option<f64>,
  pub rsi: Option<Option<f64>>,
  pub macd: Option<MacdInput>,
  pub bollinger: Option<BollingerInput>,
  pub stochastic: Option<StochasticInput>,
}

impl LatestValues {
  /// 지표 묶음의 마지막 값(MACD는 마지막 두 값)으로 입력 구성
  pub fn from_bundle(bundle: &IndicatorBundle, price: Option<f64>) -> Self {
    let rsi = bundle
      .series("rsi")
      .filter(|s| !s.is_empty())
      .map(|_| bundle.latest("rsi"));

    let macd = bundle
      .macd()
      .filter(|m| m.macd.len() >= 2)
      .map(|_| MacdInput {
        macd: bundle.latest("macd"),
        signal: bundle.latest("signal"),
        prev_macd: bundle.previous("macd"),
        prev_signal: bundle.previous("signal"),
      });

    let bollinger = bundle
      .bollinger()
      .filter(|b| !b.upper.is_empty() && price.is_some())
      .map(|_| BollingerInput {
        upper: bundle.latest("bb_upper"),
        lower: bundle.latest("bb_lower"),
        middle: bundle.latest("bb_middle"),
      });

    let stochastic = bundle
      .stochastic()
      .filter(|s| !s.percent_k.is_empty())
      .map(|_| StochasticInput {
        k: bundle.latest("stoch_k"),
        d: bundle.latest("stoch_d"),
      });

    LatestValues {
      price,
      rsi,
      macd,
      bollinger,
      stochastic,
    }
  }
}

pub struct SignalAnalyzer {
  config: SignalConfig,
}

impl SignalAnalyzer {
  pub fn new(config: SignalConfig) -> Self {
    SignalAnalyzer { config }
  }

  // 계산 가능한 지표별 신호 수집
  pub fn individual_signals(&self, values: &LatestValues) -> BTreeMap<String, Signal> {
    let mut signals = BTreeMap::new();

    if let Some(rsi) = values.rsi {
      signals.insert("rsi".to_string(), rsi_signal(rsi, &self.config));
    }

    if let Some(m) = values.macd {
      signals.insert(
        "macd".to_string(),
        macd_signal(m.macd, m.signal, m.prev_macd, m.prev_signal),
      );
    }

    if let Some(b) = values.bollinger {
      signals.insert(
        "bollinger".to_string(),
        bollinger_signal(values.price, b.upper, b.lower, b.middle),
      );
    }

    if let Some(s) = values.stochastic {
      signals.insert("stochastic".to_string(), stochastic_signal(s.k, s.d, &self.config));
    }

    signals
  }

  /// 개별 신호를 종합
  ///
  /// 매수 표가 매도 표보다 많고 3개 이상이면 strong_buy, 2개 이상이면 buy.
  /// 매도도 동일하며, 나머지(동수 포함)는 neutral.
  pub fn composite_signal(&self, values: &LatestValues) -> CompositeSignal {
    let individual = self.individual_signals(values);
    Self::fuse(individual)
  }

  pub fn fuse(individual: BTreeMap<String, Signal>) -> CompositeSignal {
    let buy_count = individual.values().filter(|s| s.is_buy()).count();
    let sell_count = individual.values().filter(|s| s.is_sell()).count();

    let composite = if buy_count > sell_count && buy_count >= 3 {
      Signal::StrongBuy
    } else if buy_count > sell_count && buy_count >= 2 {
      Signal::Buy
    } else if sell_count > buy_count && sell_count >= 3 {
      Signal::StrongSell
    } else if sell_count > buy_count && sell_count >= 2 {
      Signal::Sell
    } else {
      Signal::Neutral
    };

    log::debug!(
      "종합 신호: {} (매수 {}, 매도 {}, 지표 {}개)",
      composite,
      buy_count,
      sell_count,
      individual.len()
    );

    CompositeSignal {
      composite,
      individual,
      buy_count,
      sell_count,
      timestamp: Utc::now(),
    }
  }
}

impl Default for SignalAnalyzer {
  fn default() -> Self {
    SignalAnalyzer::new(SignalConfig::default())
  }
}
