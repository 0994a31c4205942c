use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::IndicatorError;
use crate::models::market_data::{PriceBar, PriceSeries};

/// 종목별 일봉 이력 제공자 인터페이스
#[cfg_attr(test, mockall::automock)]
pub trait PriceHistoryProvider: Send + Sync {
    /// 제공 가능한 종목 목록
    fn available_symbols(&self) -> Vec<String>;

    /// 시작일(포함) 이후 가격 이력 로드, 시작일이 없으면 전체
    fn load_series(&self, symbol: &str, start: Option<NaiveDate>) -> Result<PriceSeries, IndicatorError>;
}

/// 디렉터리의 `{SYMBOL}.csv` 파일에서 이력을 읽는 제공자
///
/// 열: `date,open,high,low,close,volume` (date는 YYYY-MM-DD)
pub struct CsvPriceProvider {
    dir: PathBuf,
    delimiter: u8,
}

impl CsvPriceProvider {
    pub fn new(dir: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self { dir: dir.into(), delimiter }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    /// 단일 CSV 파일 읽기 (날짜순 정렬 후 검증)
    pub fn read_file(path: &Path, symbol: &str, delimiter: u8) -> Result<PriceSeries, IndicatorError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut bars = Vec::new();
        for rec in rdr.deserialize() {
            let bar: PriceBar = rec.map_err(|e| IndicatorError::ParseError(e.to_string()))?;
            bars.push(bar);
        }
        bars.sort_by_key(|b| b.date);

        log::debug!("{}: {}개 봉 로드 ({})", symbol, bars.len(), path.display());
        PriceSeries::new(symbol.to_uppercase(), bars)
    }
}

impl PriceHistoryProvider for CsvPriceProvider {
    fn available_symbols(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut symbols: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("csv"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_uppercase))
            .collect();
        symbols.sort();
        symbols
    }

    fn load_series(&self, symbol: &str, start: Option<NaiveDate>) -> Result<PriceSeries, IndicatorError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(IndicatorError::DataNotFound(symbol.to_uppercase()));
        }

        let series = Self::read_file(&path, symbol, self.delimiter)?;
        Ok(match start {
            Some(start) => series.since(start),
            None => series,
        })
    }
}

/// 메모리 보관 제공자 (테스트, 외부에서 이미 받아 둔 데이터)
#[derive(Default)]
pub struct InMemoryPriceProvider {
    series: HashMap<String, PriceSeries>,
}

impl InMemoryPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol.to_uppercase(), series);
    }
}

impl PriceHistoryProvider for InMemoryPriceProvider {
    fn available_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn load_series(&self, symbol: &str, start: Option<NaiveDate>) -> Result<PriceSeries, IndicatorError> {
        let series = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or_else(|| IndicatorError::DataNotFound(symbol.to_uppercase()))?;

        Ok(match start {
            Some(start) => series.since(start),
            None => series.clone(),
        })
    }
}
