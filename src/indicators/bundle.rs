/**
* filename : bundle
* author : HAMA
* date: 2025. 6. 5.
* description: 지표 결과 묶음
**/

use std::collections::BTreeMap;

use serde::Serialize;

use super::levels::SupportResistance;
use super::oscillators::StochasticResult;
use super::trend::MacdResult;
use super::volatility::BollingerResult;
use super::IndicatorSeries;

/// 지표 하나의 계산 결과
///
/// 단일 시리즈 지표는 `Series`, 여러 시리즈로 이루어진 지표는 각자의 결과 타입.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorOutput {
  Series(IndicatorSeries),
  Macd(MacdResult),
  Bollinger(BollingerResult),
  Stochastic(StochasticResult),
  Levels(SupportResistance),
}

impl IndicatorOutput {
  pub fn as_series(&self) -> Option<&IndicatorSeries> {
    match self {
      IndicatorOutput::Series(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_macd(&self) -> Option<&MacdResult> {
    match self {
      IndicatorOutput::Macd(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_bollinger(&self) -> Option<&BollingerResult> {
    match self {
      IndicatorOutput::Bollinger(b) => Some(b),
      _ => None,
    }
  }

  pub fn as_stochastic(&self) -> Option<&StochasticResult> {
    match self {
      IndicatorOutput::Stochastic(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_levels(&self) -> Option<&SupportResistance> {
    match self {
      IndicatorOutput::Levels(l) => Some(l),
      _ => None,
    }
  }
}

/// 지표 이름 → 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndicatorBundle {
  entries: BTreeMap<String, IndicatorOutput>,
}

impl IndicatorBundle {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, output: IndicatorOutput) {
    self.entries.insert(name.into(), output);
  }

  pub fn get(&self, name: &str) -> Option<&IndicatorOutput> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &IndicatorOutput)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn series(&self, name: &str) -> Option<&IndicatorSeries> {
    self.get(name).and_then(IndicatorOutput::as_series)
  }

  pub fn macd(&self) -> Option<&MacdResult> {
    self.get("macd").and_then(IndicatorOutput::as_macd)
  }

  pub fn bollinger(&self) -> Option<&BollingerResult> {
    self.get("bollinger").and_then(IndicatorOutput::as_bollinger)
  }

  pub fn stochastic(&self) -> Option<&StochasticResult> {
    self.get("stochastic").and_then(IndicatorOutput::as_stochastic)
  }

  pub fn levels(&self) -> Option<&SupportResistance> {
    self.get("support_resistance").and_then(IndicatorOutput::as_levels)
  }

  /// 평탄화된 키로 시리즈 조회
  ///
  /// 복합 지표의 구성 시리즈는 `macd`, `signal`, `histogram`, `bb_upper`, `bb_middle`,
  /// `bb_lower`, `bb_bandwidth`, `bb_percent_b`, `stoch_k`, `stoch_d` 키로 접근합니다.
  pub fn flat_series(&self, key: &str) -> Option<&IndicatorSeries> {
    match key {
      "macd" => self.macd().map(|m| &m.macd),
      "signal" | "macd_signal" => self.macd().map(|m| &m.signal),
      "histogram" | "macd_histogram" => self.macd().map(|m| &m.histogram),
      "bb_upper" => self.bollinger().map(|b| &b.upper),
      "bb_middle" => self.bollinger().map(|b| &b.middle),
      "bb_lower" => self.bollinger().map(|b| &b.lower),
      "bb_bandwidth" => self.bollinger().map(|b| &b.bandwidth),
      "bb_percent_b" => self.bollinger().map(|b| &b.percent_b),
      "stoch_k" => self.stochastic().map(|s| &s.percent_k),
      "stoch_d" => self.stochastic().map(|s| &s.percent_d),
      other => self.series(other),
    }
  }

  /// 마지막 값 (시리즈가 없거나 마지막 값이 비어 있으면 None)
  pub fn latest(&self, key: &str) -> Option<f64> {
    self.flat_series(key).and_then(|s| s.last().copied().flatten())
  }

  /// 끝에서 두 번째 값
  pub fn previous(&self, key: &str) -> Option<f64> {
    self
      .flat_series(key)
      .and_then(|s| s.len().checked_sub(2).map(|i| s[i]))
      .flatten()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_bundle() -> IndicatorBundle {
    let mut bundle = IndicatorBundle::new();
    bundle.insert("rsi", IndicatorOutput::Series(vec![None, Some(25.0)]));
    bundle.insert(
      "macd",
      IndicatorOutput::Macd(MacdResult {
        macd: vec![Some(-1.0), Some(1.0)],
        signal: vec![Some(0.0), Some(0.0)],
        histogram: vec![Some(-1.0), Some(1.0)],
      }),
    );
    bundle
  }

  #[test]
  fn test_flat_keys() {
    let bundle = sample_bundle();
    assert_eq!(bundle.latest("rsi"), Some(25.0));
    assert_eq!(bundle.previous("rsi"), None);
    assert_eq!(bundle.latest("macd"), Some(1.0));
    assert_eq!(bundle.previous("macd"), Some(-1.0));
    assert_eq!(bundle.latest("signal"), Some(0.0));
    assert_eq!(bundle.latest("bb_upper"), None);
  }

  #[test]
  fn test_serializes_as_name_map() {
    let json = serde_json::to_value(sample_bundle()).unwrap();
    assert_eq!(json["rsi"], serde_json::json!([null, 25.0]));
    assert_eq!(json["macd"]["histogram"], serde_json::json!([-1.0, 1.0]));
  }
}
