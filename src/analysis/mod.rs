//! 종목 단위 분석 서비스
//!
//! 가격 이력을 불러와 지표 엔진과 신호 엔진을 차례로 적용합니다.

pub mod report;
pub mod service;

pub use report::{BollingerSnapshot, IndicatorReport, IndicatorSnapshot, MacdSnapshot, SignalReport};
pub use service::AnalysisService;
