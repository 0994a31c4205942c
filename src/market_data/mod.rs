pub mod provider;

pub use provider::{CsvPriceProvider, InMemoryPriceProvider, PriceHistoryProvider};
