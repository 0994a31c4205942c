/**
* filename : engine
* author : HAMA
* date: 2025. 6. 5.
* description: 이름 기반 지표 계산 및 일괄 계산
**/

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::models::market_data::Ohlcv;
use super::bundle::{IndicatorBundle, IndicatorOutput};
use super::{
  atr, bollinger_bands, ema, levels, macd, obv, rsi, sma, stochastic,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
  Sma,
  Ema,
  Rsi,
  Macd,
  Bollinger,
  Stochastic,
  Atr,
  Obv,
  SupportResistance,
}

impl IndicatorKind {
  pub const ALL: [IndicatorKind; 9] = [
    IndicatorKind::Sma,
    IndicatorKind::Ema,
    IndicatorKind::Rsi,
    IndicatorKind::Macd,
    IndicatorKind::Bollinger,
    IndicatorKind::Stochastic,
    IndicatorKind::Atr,
    IndicatorKind::Obv,
    IndicatorKind::SupportResistance,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      IndicatorKind::Sma => "sma",
      IndicatorKind::Ema => "ema",
      IndicatorKind::Rsi => "rsi",
      IndicatorKind::Macd => "macd",
      IndicatorKind::Bollinger => "bollinger",
      IndicatorKind::Stochastic => "stochastic",
      IndicatorKind::Atr => "atr",
      IndicatorKind::Obv => "obv",
      IndicatorKind::SupportResistance => "support_resistance",
    }
  }
}

impl FromStr for IndicatorKind {
  type Err = IndicatorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "sma" => Ok(IndicatorKind::Sma),
      "ema" => Ok(IndicatorKind::Ema),
      "rsi" => Ok(IndicatorKind::Rsi),
      "macd" => Ok(IndicatorKind::Macd),
      "bb" | "bollinger" => Ok(IndicatorKind::Bollinger),
      "stoch" | "stochastic" => Ok(IndicatorKind::Stochastic),
      "atr" => Ok(IndicatorKind::Atr),
      "obv" => Ok(IndicatorKind::Obv),
      "support_resistance" | "sr" => Ok(IndicatorKind::SupportResistance),
      other => Err(IndicatorError::UnknownIndicator(other.to_string())),
    }
  }
}

impl fmt::Display for IndicatorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// 지표별 계산 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndicatorParams {
  Period(usize),
  Macd { fast: usize, slow: usize, signal: usize },
  Bollinger { period: usize, std_dev: f64 },
  Stochastic { period: usize, smooth_k: usize, smooth_d: usize },
  Levels { window: usize, num_levels: usize },
  None,
}

impl IndicatorParams {
  /// 설정값으로 기본 파라미터 구성 (SMA/EMA는 첫 번째 기간)
  pub fn defaults(kind: IndicatorKind, config: &IndicatorConfig) -> Self {
    match kind {
      IndicatorKind::Sma => IndicatorParams::Period(config.sma_periods.first().copied().unwrap_or(20)),
      IndicatorKind::Ema => IndicatorParams::Period(config.ema_periods.first().copied().unwrap_or(12)),
      IndicatorKind::Rsi => IndicatorParams::Period(config.rsi_period),
      IndicatorKind::Atr => IndicatorParams::Period(config.atr_period),
      IndicatorKind::Macd => IndicatorParams::Macd {
        fast: config.macd_fast,
        slow: config.macd_slow,
        signal: config.macd_signal,
      },
      IndicatorKind::Bollinger => IndicatorParams::Bollinger {
        period: config.bollinger_period,
        std_dev: config.bollinger_std_dev,
      },
      IndicatorKind::Stochastic => IndicatorParams::Stochastic {
        period: config.stochastic_period,
        smooth_k: config.stochastic_smooth_k,
        smooth_d: config.stochastic_smooth_d,
      },
      IndicatorKind::SupportResistance => IndicatorParams::Levels {
        window: config.sr_window,
        num_levels: config.sr_levels,
      },
      IndicatorKind::Obv => IndicatorParams::None,
    }
  }
}

/// 요청된 지표 목록 ("all" 또는 쉼표로 구분된 이름)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorSelection {
  All,
  Only(BTreeSet<IndicatorKind>),
}

impl IndicatorSelection {
  pub fn includes(&self, kind: IndicatorKind) -> bool {
    match self {
      IndicatorSelection::All => true,
      IndicatorSelection::Only(kinds) => kinds.contains(&kind),
    }
  }

  pub fn kinds(&self) -> Vec<IndicatorKind> {
    IndicatorKind::ALL.iter().copied().filter(|k| self.includes(*k)).collect()
  }
}

impl Default for IndicatorSelection {
  fn default() -> Self {
    IndicatorSelection::All
  }
}

impl FromStr for IndicatorSelection {
  type Err = IndicatorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let tokens: Vec<&str> = s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();

    if tokens.is_empty() || tokens.iter().any(|t| t.eq_ignore_ascii_case("all")) {
      return Ok(IndicatorSelection::All);
    }

    let kinds = tokens
      .into_iter()
      .map(IndicatorKind::from_str)
      .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(IndicatorSelection::Only(kinds))
  }
}

/// 지표 하나 계산
///
/// 종가만 쓰는 지표는 `close` 열만 사용하므로 나머지 열이 비어 있어도 됩니다.
pub fn compute_indicator(
  kind: IndicatorKind,
  data: &Ohlcv,
  params: &IndicatorParams,
) -> Result<IndicatorOutput, IndicatorError> {
  log::debug!("지표 계산: {} ({:?}), 데이터 {}개", kind, params, data.len());

  let output = match (kind, params) {
    (IndicatorKind::Sma, IndicatorParams::Period(p)) => IndicatorOutput::Series(sma(&data.close, *p)?),
    (IndicatorKind::Ema, IndicatorParams::Period(p)) => IndicatorOutput::Series(ema(&data.close, *p)?),
    (IndicatorKind::Rsi, IndicatorParams::Period(p)) => IndicatorOutput::Series(rsi(&data.close, *p)?),
    (IndicatorKind::Atr, IndicatorParams::Period(p)) => {
      IndicatorOutput::Series(atr(&data.high, &data.low, &data.close, *p)?)
    }
    (IndicatorKind::Macd, IndicatorParams::Macd { fast, slow, signal }) => {
      IndicatorOutput::Macd(macd(&data.close, *fast, *slow, *signal)?)
    }
    (IndicatorKind::Bollinger, IndicatorParams::Bollinger { period, std_dev }) => {
      IndicatorOutput::Bollinger(bollinger_bands(&data.close, *period, *std_dev)?)
    }
    (IndicatorKind::Stochastic, IndicatorParams::Stochastic { period, smooth_k, smooth_d }) => {
      IndicatorOutput::Stochastic(stochastic(&data.high, &data.low, &data.close, *period, *smooth_k, *smooth_d)?)
    }
    (IndicatorKind::SupportResistance, IndicatorParams::Levels { window, num_levels }) => {
      IndicatorOutput::Levels(levels::support_resistance(&data.close, *window, *num_levels)?)
    }
    (IndicatorKind::Obv, _) => IndicatorOutput::Series(obv(&data.volume, &data.close)?),
    (kind, params) => {
      return Err(IndicatorError::InvalidParameter(format!(
        "parameters {:?} do not apply to {}",
        params, kind
      )))
    }
  };

  Ok(output)
}

/// 이름으로 지표 계산, 파라미터가 없으면 기본값 사용
pub fn compute_indicator_by_name(
  name: &str,
  data: &Ohlcv,
  params: Option<&IndicatorParams>,
) -> Result<IndicatorOutput, IndicatorError> {
  let kind: IndicatorKind = name.parse()?;
  match params {
    Some(params) => compute_indicator(kind, data, params),
    None => compute_indicator(kind, data, &IndicatorParams::defaults(kind, &IndicatorConfig::default())),
  }
}

/// 기본 설정으로 모든 지표 계산
pub fn compute_all_indicators(data: &Ohlcv) -> Result<IndicatorBundle, IndicatorError> {
  compute_all_with(data, &IndicatorConfig::default())
}

pub fn compute_all_with(data: &Ohlcv, config: &IndicatorConfig) -> Result<IndicatorBundle, IndicatorError> {
  compute_selected(data, &IndicatorSelection::All, config)
}

/// 선택한 지표만 계산
///
/// 키: `sma_{기간}`, `ema_{기간}`, `rsi`, `macd`, `bollinger`, `stochastic`, `atr`,
/// `obv`, `support_resistance`.
pub fn compute_selected(
  data: &Ohlcv,
  selection: &IndicatorSelection,
  config: &IndicatorConfig,
) -> Result<IndicatorBundle, IndicatorError> {
  data.validate()?;
  config.validate()?;

  let mut bundle = IndicatorBundle::new();

  for kind in selection.kinds() {
    match kind {
      IndicatorKind::Sma => {
        for &period in &config.sma_periods {
          let output = compute_indicator(kind, data, &IndicatorParams::Period(period))?;
          bundle.insert(format!("sma_{}", period), output);
        }
      }
      IndicatorKind::Ema => {
        for &period in &config.ema_periods {
          let output = compute_indicator(kind, data, &IndicatorParams::Period(period))?;
          bundle.insert(format!("ema_{}", period), output);
        }
      }
      _ => {
        let output = compute_indicator(kind, data, &IndicatorParams::defaults(kind, config))?;
        bundle.insert(kind.name(), output);
      }
    }
  }

  log::debug!("지표 {}개 계산 완료", bundle.len());
  Ok(bundle)
}
