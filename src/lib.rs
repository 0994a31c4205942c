//! 기술적 지표 및 매매 신호 라이브러리
//!
//! 일봉 OHLCV 시계열로부터 이동평균, 오실레이터, 밴드, 변동성, 거래량,
//! 지지/저항 레벨을 계산하고 이를 종합 매매 신호로 변환합니다.

pub mod analysis;
pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::IndicatorError;
pub use crate::indicators::{
  compute_all_indicators, compute_indicator, IndicatorBundle, IndicatorKind, IndicatorOutput,
  IndicatorParams, IndicatorSeries,
};
pub use crate::models::market_data::{Ohlcv, PriceBar, PriceSeries};
pub use crate::signals::{CompositeSignal, LatestValues, Signal, SignalAnalyzer};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, IndicatorError>;
