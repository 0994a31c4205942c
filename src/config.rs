/**
* filename : config
* author : HAMA
* date: 2025. 6. 2.
* description:
**/

use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

const DEFAULT_CONFIG_FILE: &str = "stock_ta.json";
const ENV_PREFIX: &str = "STOCK_TA";
// 신호 계산 기간 상한 (약 100년)
const MAX_SIGNAL_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// 지표 계산 파라미터 (기본값은 일봉 기준 관례값)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub stochastic_period: usize,
    pub stochastic_smooth_k: usize,
    pub stochastic_smooth_d: usize,
    pub atr_period: usize,
    pub sr_window: usize,
    pub sr_levels: usize,
}

/// 매매 신호 임계값
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: String,
    pub delimiter: String,
    pub default_lookback: String,
    pub signal_days: i64,
    pub comparison_bars: usize,
}

impl Config {
    /// 기본 경로(stock_ta.json)와 환경 변수에서 설정 로드
    pub fn load() -> Result<Self, IndicatorError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// 지정한 JSON 파일(없어도 됨) 위에 STOCK_TA__* 환경 변수를 덮어써서 로드
    pub fn load_from(path: &str) -> Result<Self, IndicatorError> {
        let settings = config::Config::builder()
            .add_source(File::new(path, FileFormat::Json).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;

        log::debug!("설정 로드 완료: {}", path);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        self.indicators.validate()?;
        self.signals.validate()?;
        self.data.validate()
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("stochastic_period", self.stochastic_period),
            ("stochastic_smooth_k", self.stochastic_smooth_k),
            ("stochastic_smooth_d", self.stochastic_smooth_d),
            ("atr_period", self.atr_period),
            ("sr_window", self.sr_window),
            ("sr_levels", self.sr_levels),
        ];

        for (name, value) in periods {
            if value == 0 {
                return Err(IndicatorError::InvalidParameter(format!("{} must be positive", name)));
            }
        }

        if self.sma_periods.iter().chain(self.ema_periods.iter()).any(|p| *p == 0) {
            return Err(IndicatorError::InvalidParameter(
                "moving average periods must be positive".to_string(),
            ));
        }

        if !(self.bollinger_std_dev.is_finite() && self.bollinger_std_dev > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "bollinger_std_dev must be a positive number, got {}",
                self.bollinger_std_dev
            )));
        }

        Ok(())
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(IndicatorError::InvalidParameter(
                "rsi_oversold must be below rsi_overbought".to_string(),
            ));
        }
        if self.stochastic_oversold >= self.stochastic_overbought {
            return Err(IndicatorError::InvalidParameter(
                "stochastic_oversold must be below stochastic_overbought".to_string(),
            ));
        }
        Ok(())
    }
}

impl DataConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.delimiter.len() != 1 {
            return Err(IndicatorError::ConfigError(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if !(1..=MAX_SIGNAL_DAYS).contains(&self.signal_days) {
            return Err(IndicatorError::InvalidParameter(format!(
                "signal_days must be between 1 and {}, got {}",
                MAX_SIGNAL_DAYS, self.signal_days
            )));
        }
        if self.comparison_bars == 0 {
            return Err(IndicatorError::InvalidParameter(
                "comparison_bars must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            sma_periods: vec![20, 50, 200],
            ema_periods: vec![12, 26],
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            stochastic_period: 14,
            stochastic_smooth_k: 3,
            stochastic_smooth_d: 3,
            atr_period: 14,
            sr_window: 20,
            sr_levels: 5,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stochastic_oversold: 20.0,
            stochastic_overbought: 80.0,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            data_dir: "./data".to_string(),
            delimiter: ",".to_string(),
            default_lookback: "90d".to_string(),
            signal_days: 100,
            comparison_bars: 50,
        }
    }
}
