use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use log::{debug, info, warn};

use crate::config::Config;
use crate::error::IndicatorError;
use crate::indicators::{compute_selected, IndicatorKind, IndicatorSelection};
use crate::market_data::PriceHistoryProvider;
use crate::models::{Lookback, PriceSeries};
use crate::signals::{LatestValues, SignalAnalyzer};
use crate::utils::logging;

use super::report::{IndicatorReport, IndicatorSnapshot, SignalReport};

/// 비교 화면에서 지원하는 지표
const COMPARABLE: [IndicatorKind; 3] = [IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::Bollinger];

/// 가격 이력 제공자와 설정을 묶은 분석 서비스
///
/// 상태가 없으므로 복제해서 여러 작업에 나눠 쓸 수 있습니다.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn PriceHistoryProvider>,
    config: Config,
    as_of: Option<NaiveDate>,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>, config: Config) -> Self {
        Self {
            provider,
            config,
            as_of: None,
        }
    }

    /// 기간 계산 기준일 고정 (지정하지 않으면 각 종목의 마지막 봉 날짜)
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    // 기준일에서 days만큼 거슬러 올라간 구간 로드, 기준일 이후 봉은 제외
    fn load_window(&self, symbol: &str, days: Option<i64>) -> Result<PriceSeries, IndicatorError> {
        let series = match self.as_of {
            Some(as_of) => {
                let start = days.map(|d| window_start(as_of, d)).transpose()?;
                self.provider.load_series(symbol, start)?.until(as_of)
            }
            None => {
                let full = self.provider.load_series(symbol, None)?;
                match (full.bars().last().map(|b| b.date), days) {
                    (Some(last), Some(days)) => full.since(window_start(last, days)?),
                    _ => full,
                }
            }
        };

        if series.is_empty() {
            return Err(IndicatorError::DataNotFound(symbol.to_uppercase()));
        }
        Ok(series)
    }

    /// 기간 내 가격과 선택한 지표, 종합 신호
    pub fn indicators(
        &self,
        symbol: &str,
        lookback: Lookback,
        selection: &IndicatorSelection,
    ) -> Result<IndicatorReport, IndicatorError> {
        let series = self.load_window(symbol, lookback.days())?;
        logging::log_analysis_start(&series.symbol, series.len());

        let indicators = compute_selected(&series.to_ohlcv(), selection, &self.config.indicators)?;
        let current_price = series.last_close();

        let analyzer = SignalAnalyzer::new(self.config.signals.clone());
        let composite = analyzer.composite_signal(&LatestValues::from_bundle(&indicators, current_price));
        logging::log_analysis_end(&series.symbol, composite.composite.as_str());

        Ok(IndicatorReport {
            symbol: series.symbol.clone(),
            lookback,
            dates: series.dates(),
            prices: series.closes(),
            current_price,
            indicators,
            composite,
        })
    }

    /// 최근 signal_days일 데이터로 종합 신호 계산
    pub fn signal(&self, symbol: &str) -> Result<SignalReport, IndicatorError> {
        let series = self.load_window(symbol, Some(self.config.data.signal_days))?;
        let current_price = series.last_close();

        let indicators = compute_selected(&series.to_ohlcv(), &IndicatorSelection::All, &self.config.indicators)?;
        let analyzer = SignalAnalyzer::new(self.config.signals.clone());
        let composite = analyzer.composite_signal(&LatestValues::from_bundle(&indicators, current_price));

        let report = SignalReport::new(series.symbol.clone(), current_price, composite);
        info!(
            "{} 신호: {} (신뢰도 {:.1}, 봉 {}개)",
            report.symbol,
            report.composite.composite,
            report.confidence,
            series.len()
        );
        Ok(report)
    }

    /// 여러 종목의 최신 지표 비교
    ///
    /// 종목별 최근 comparison_bars개 봉을 사용하며, 데이터가 없는 종목은 건너뜁니다.
    /// RSI, MACD, 볼린저 외의 지표는 무시합니다.
    pub fn compare(&self, symbols: &[String], kinds: &[IndicatorKind]) -> Result<Vec<IndicatorSnapshot>, IndicatorError> {
        let requested: BTreeSet<IndicatorKind> = kinds.iter().copied().filter(|k| COMPARABLE.contains(k)).collect();
        if requested.len() < kinds.len() {
            debug!("비교 미지원 지표 제외: {:?}", kinds);
        }
        let selection = IndicatorSelection::Only(requested);

        let mut snapshots = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let series = match self.provider.load_series(symbol, None) {
                Ok(series) if !series.is_empty() => series.tail(self.config.data.comparison_bars),
                Ok(_) | Err(IndicatorError::DataNotFound(_)) => {
                    debug!("비교 대상 제외 (데이터 없음): {}", symbol);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let bundle = compute_selected(&series.to_ohlcv(), &selection, &self.config.indicators)?;
            snapshots.push(IndicatorSnapshot::from_bundle(
                series.symbol.clone(),
                series.last_close(),
                &bundle,
            ));
        }

        info!("종목 비교 완료: 요청 {}개, 결과 {}개", symbols.len(), snapshots.len());
        Ok(snapshots)
    }

    /// 여러 종목의 신호를 병렬 계산
    ///
    /// 종목마다 블로킹 작업 하나를 띄우고 모두 끝날 때까지 기다립니다.
    /// 결과는 입력 순서를 유지합니다.
    pub async fn analyze_many(&self, symbols: &[String]) -> Vec<(String, Result<SignalReport, IndicatorError>)> {
        let tasks = symbols.iter().cloned().map(|symbol| {
            let service = self.clone();
            tokio::task::spawn_blocking(move || {
                let result = service.signal(&symbol);
                (symbol, result)
            })
        });

        let joined = join_all(tasks).await;

        joined
            .into_iter()
            .zip(symbols)
            .map(|(res, symbol)| match res {
                Ok((symbol, result)) => {
                    if let Err(e) = &result {
                        logging::log_error(&symbol, e);
                    }
                    (symbol, result)
                }
                Err(e) => {
                    warn!("{} 분석 작업 실패: {}", symbol, e);
                    (symbol.clone(), Err(IndicatorError::TaskError(e.to_string())))
                }
            })
            .collect()
    }
}

fn window_start(anchor: NaiveDate, days: i64) -> Result<NaiveDate, IndicatorError> {
    if days < 0 {
        return Err(IndicatorError::InvalidParameter(format!("window must not be negative, got {} days", days)));
    }
    Duration::try_days(days)
        .and_then(|d| anchor.checked_sub_signed(d))
        .ok_or_else(|| IndicatorError::InvalidParameter(format!("window of {} days is out of range", days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::provider::MockPriceHistoryProvider;
    use crate::market_data::InMemoryPriceProvider;
    use crate::models::PriceBar;
    use crate::signals::Signal;
    use rust_decimal::Decimal;

    fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let close = Decimal::from_f64_retain(c).unwrap();
                PriceBar::new(
                    start + Duration::days(i as i64),
                    close,
                    close + Decimal::ONE,
                    close - Decimal::ONE,
                    close,
                    1_000 + i as u64,
                )
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 / 4.0).sin() * 8.0).collect()
    }

    fn in_memory(entries: Vec<PriceSeries>) -> Arc<dyn PriceHistoryProvider> {
        let mut provider = InMemoryPriceProvider::new();
        for s in entries {
            provider.insert(s);
        }
        Arc::new(provider)
    }

    #[test]
    fn test_indicators_respects_lookback_and_selection() {
        let provider = in_memory(vec![series("AAPL", &wave(200))]);
        let service = AnalysisService::new(provider, Config::default());

        let selection: IndicatorSelection = "rsi,macd".parse().unwrap();
        let report = service.indicators("AAPL", Lookback::Days30, &selection).unwrap();

        // 마지막 봉 기준 30일 전부터 (양 끝 포함)
        assert_eq!(report.dates.len(), 31);
        assert_eq!(report.prices.len(), 31);
        assert_eq!(report.indicators.len(), 2);
        assert!(report.indicators.contains("rsi"));
        assert!(report.indicators.contains("macd"));
        assert_eq!(report.current_price, report.prices.last().copied());
    }

    #[test]
    fn test_signal_uses_mocked_provider() {
        let mut mock = MockPriceHistoryProvider::new();
        let data = series("MSFT", &(0..120).map(|i| 200.0 - i as f64).collect::<Vec<_>>());
        mock.expect_load_series()
            .withf(|symbol, start| symbol.eq_ignore_ascii_case("MSFT") && start.is_none())
            .times(1)
            .returning(move |_, _| Ok(data.clone()));

        let service = AnalysisService::new(Arc::new(mock), Config::default());
        let report = service.signal("MSFT").unwrap();

        assert_eq!(report.symbol, "MSFT");
        // 계속 하락: RSI 0, 스토캐스틱 과매도
        assert_eq!(report.composite.individual["rsi"], Signal::Buy);
        assert!(report.confidence >= 0.0 && report.confidence <= 100.0);
        assert_eq!(report.recommendation, report.composite.composite.recommendation());
    }

    #[test]
    fn test_signal_with_fixed_as_of_passes_start_to_provider() {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let expected_start = as_of - Duration::days(100);

        let mut mock = MockPriceHistoryProvider::new();
        mock.expect_load_series()
            .withf(move |_, start| start.as_ref() == Some(&expected_start))
            .times(1)
            .returning(|_, _| Err(IndicatorError::DataNotFound("AAPL".into())));

        let service = AnalysisService::new(Arc::new(mock), Config::default()).with_as_of(as_of);
        assert!(matches!(service.signal("AAPL"), Err(IndicatorError::DataNotFound(_))));
    }

    #[test]
    fn test_as_of_excludes_later_bars() {
        let provider = in_memory(vec![series("AAPL", &(0..200).map(|i| 100.0 + i as f64).collect::<Vec<_>>())]);
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let service = AnalysisService::new(provider, Config::default()).with_as_of(as_of);

        let report = service.indicators("AAPL", Lookback::Days30, &IndicatorSelection::All).unwrap();
        assert_eq!(report.dates.first().copied(), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(report.dates.last().copied(), Some(as_of));
        assert_eq!(report.dates.len(), 31);
        // 2024-03-01은 61번째 봉 (종가 160)
        assert_eq!(report.current_price, Some(160.0));

        let full = service.indicators("AAPL", Lookback::Max, &IndicatorSelection::All).unwrap();
        assert_eq!(full.dates.len(), 61);
        assert!(full.dates.iter().all(|d| *d <= as_of));

        assert_eq!(service.signal("AAPL").unwrap().current_price, Some(160.0));
    }

    #[test]
    fn test_oversized_signal_window_is_an_error() {
        let provider = in_memory(vec![series("AAPL", &wave(50))]);
        let mut config = Config::default();
        config.data.signal_days = i64::MAX / 1000;

        let service = AnalysisService::new(provider, config);
        assert!(matches!(service.signal("AAPL"), Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_compare_skips_unknown_symbols() {
        let provider = in_memory(vec![series("AAPL", &wave(80)), series("MSFT", &wave(40))]);
        let service = AnalysisService::new(provider, Config::default());

        let symbols = vec!["AAPL".to_string(), "NOPE".to_string(), "MSFT".to_string()];
        let kinds = [IndicatorKind::Rsi, IndicatorKind::Bollinger, IndicatorKind::Obv];
        let snapshots = service.compare(&symbols, &kinds).unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].symbol, "AAPL");
        assert_eq!(snapshots[1].symbol, "MSFT");
        assert!(snapshots[0].rsi.is_some());
        assert!(snapshots[0].bollinger.is_some());
        assert!(snapshots[0].macd.is_none());
    }

    #[tokio::test]
    async fn test_analyze_many_keeps_order_and_reports_errors() {
        let provider = in_memory(vec![series("AAPL", &wave(120)), series("MSFT", &wave(120))]);
        let service = AnalysisService::new(provider, Config::default());

        let symbols = vec!["MSFT".to_string(), "NOPE".to_string(), "AAPL".to_string()];
        let results = service.analyze_many(&symbols).await;

        let names: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["MSFT", "NOPE", "AAPL"]);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(IndicatorError::DataNotFound(_))));
        assert!(results[2].1.is_ok());
    }
}
