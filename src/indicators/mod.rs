/**
* filename : mod
* author : HAMA
* date: 2025. 6. 3.
* description: 기술적 지표 계산 엔진
**/
pub mod bundle;
pub mod engine;
pub mod levels;
pub mod moving_averages;
pub mod oscillators;
pub mod trend;
pub mod utils;
pub mod volatility;
pub mod volume;

pub use bundle::*;
pub use engine::*;
pub use levels::*;
pub use moving_averages::{ema, sma};
pub use oscillators::*;
pub use trend::*;
pub use volatility::*;
pub use volume::*;

/// 입력과 같은 길이의 지표 시리즈, 계산할 수 없는 위치는 None
pub type IndicatorSeries = Vec<Option<f64>>;
