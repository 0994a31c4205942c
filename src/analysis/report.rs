use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorBundle;
use crate::models::Lookback;
use crate::signals::CompositeSignal;

/// 종목 하나의 지표 조회 결과
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReport {
    pub symbol: String,
    pub lookback: Lookback,
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub current_price: Option<f64>,
    pub indicators: IndicatorBundle,
    pub composite: CompositeSignal,
}

/// 종목 하나의 종합 신호
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub composite: CompositeSignal,
    pub confidence: f64,
    pub recommendation: String,
}

impl SignalReport {
    pub fn new(symbol: impl Into<String>, current_price: Option<f64>, composite: CompositeSignal) -> Self {
        let confidence = composite.confidence();
        let recommendation = composite.recommendation().to_string();
        SignalReport {
            symbol: symbol.into(),
            current_price,
            composite,
            confidence,
            recommendation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerSnapshot {
    pub percent_b: f64,
    pub bandwidth: f64,
}

/// 종목 비교용 최신 지표 값
///
/// 요청하지 않은 지표는 빠지고, 요청했지만 값이 없는 항목은 0으로 채웁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub current_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerSnapshot>,
}

impl IndicatorSnapshot {
    pub fn from_bundle(symbol: impl Into<String>, current_price: Option<f64>, bundle: &IndicatorBundle) -> Self {
        let latest_or_zero = |key: &str| bundle.latest(key).unwrap_or(0.0);

        let rsi = bundle.series("rsi").map(|_| latest_or_zero("rsi"));

        let macd = bundle.macd().map(|_| MacdSnapshot {
            macd: latest_or_zero("macd"),
            signal: latest_or_zero("signal"),
            histogram: latest_or_zero("histogram"),
        });

        let bollinger = bundle.bollinger().map(|_| BollingerSnapshot {
            percent_b: latest_or_zero("bb_percent_b"),
            bandwidth: latest_or_zero("bb_bandwidth"),
        });

        IndicatorSnapshot {
            symbol: symbol.into(),
            current_price,
            rsi,
            macd,
            bollinger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{IndicatorOutput, MacdResult};

    #[test]
    fn test_snapshot_fills_absent_with_zero() {
        let mut bundle = IndicatorBundle::new();
        bundle.insert("rsi", IndicatorOutput::Series(vec![None, None]));
        bundle.insert(
            "macd",
            IndicatorOutput::Macd(MacdResult {
                macd: vec![None, Some(1.5)],
                signal: vec![None, None],
                histogram: vec![None, None],
            }),
        );

        let snapshot = IndicatorSnapshot::from_bundle("AAPL", Some(10.0), &bundle);
        assert_eq!(snapshot.rsi, Some(0.0));
        assert_eq!(
            snapshot.macd,
            Some(MacdSnapshot { macd: 1.5, signal: 0.0, histogram: 0.0 })
        );
        assert!(snapshot.bollinger.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("bollinger").is_none());
    }
}
