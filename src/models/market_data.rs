use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// 일봉 한 개 (가격은 저장소의 정밀도를 그대로 유지)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// 날짜 오름차순으로 정렬된 종목별 가격 이력
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 날짜가 엄격히 증가하지 않으면 UnorderedSeries 오류
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, IndicatorError> {
        if let Some(pos) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(IndicatorError::UnorderedSeries(pos + 1));
        }

        Ok(PriceSeries {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| to_f64(b.close)).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| to_f64(b.high)).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| to_f64(b.low)).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| to_f64(b.close))
    }

    /// 주어진 날짜 이후(포함)의 구간
    pub fn since(&self, start: NaiveDate) -> PriceSeries {
        let from = self.bars.partition_point(|b| b.date < start);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[from..].to_vec(),
        }
    }

    /// 주어진 날짜 이전(포함)의 구간
    pub fn until(&self, end: NaiveDate) -> PriceSeries {
        let to = self.bars.partition_point(|b| b.date <= end);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..to].to_vec(),
        }
    }

    /// 최근 n개 봉
    pub fn tail(&self, n: usize) -> PriceSeries {
        let from = self.bars.len().saturating_sub(n);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[from..].to_vec(),
        }
    }

    /// 지표 엔진 입력용 열 단위 배열로 변환
    pub fn to_ohlcv(&self) -> Ohlcv {
        Ohlcv {
            open: self.bars.iter().map(|b| to_f64(b.open)).collect(),
            high: self.highs(),
            low: self.lows(),
            close: self.closes(),
            volume: self.volumes(),
        }
    }
}

/// 열 단위 OHLCV 배열 (모든 열은 같은 길이여야 함)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl Ohlcv {
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        let n = self.close.len();
        let columns = [
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("volume", self.volume.len()),
        ];

        for (name, len) in columns {
            if len != n {
                return Err(IndicatorError::mismatch(name, len, "close", n));
            }
        }

        Ok(())
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(day: u32, close: Decimal) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        PriceBar::new(date, close, close + dec!(1), close - dec!(1), close, 1_000)
    }

    #[test]
    fn test_unordered_dates_rejected() {
        let bars = vec![bar(1, dec!(10)), bar(3, dec!(11)), bar(2, dec!(12))];
        let err = PriceSeries::new("AAPL", bars).unwrap_err();
        assert!(matches!(err, IndicatorError::UnorderedSeries(2)));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let bars = vec![bar(1, dec!(10)), bar(1, dec!(11))];
        assert!(PriceSeries::new("AAPL", bars).is_err());
    }

    #[test]
    fn test_gaps_are_tolerated() {
        let bars = vec![bar(1, dec!(10)), bar(5, dec!(11)), bar(20, dec!(12))];
        let series = PriceSeries::new("AAPL", bars).unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_since_and_tail() {
        let bars = (1..=10).map(|d| bar(d, Decimal::from(d))).collect();
        let series = PriceSeries::new("AAPL", bars).unwrap();

        let recent = series.since(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(recent.len(), 4);
        assert_eq!(series.tail(3).closes(), vec![8.0, 9.0, 10.0]);
        assert_eq!(series.tail(50).len(), 10);
    }

    #[test]
    fn test_until_is_inclusive() {
        let bars = (1..=10).map(|d| bar(d, Decimal::from(d))).collect();
        let series = PriceSeries::new("AAPL", bars).unwrap();

        let early = series.until(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(early.closes(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(series.until(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).is_empty());
        assert_eq!(series.until(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()).len(), 10);
    }

    #[test]
    fn test_ohlcv_validate_mismatch() {
        let ohlcv = Ohlcv {
            open: vec![1.0, 2.0],
            high: vec![1.0, 2.0],
            low: vec![1.0],
            close: vec![1.0, 2.0],
            volume: vec![1.0, 2.0],
        };
        assert!(matches!(
            ohlcv.validate(),
            Err(IndicatorError::InputMismatch { left: "low", .. })
        ));
    }
}
