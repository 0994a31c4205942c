pub mod lookback;
pub mod market_data;

pub use lookback::Lookback;
pub use market_data::{Ohlcv, PriceBar, PriceSeries};
