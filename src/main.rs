/**
* filename : main
* author : HAMA
* date: 2025. 6. 10.
* description: 기술적 지표/신호 명령줄 도구
**/

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context};

use stock_ta::analysis::AnalysisService;
use stock_ta::config::Config;
use stock_ta::indicators::{IndicatorKind, IndicatorSelection};
use stock_ta::market_data::{CsvPriceProvider, PriceHistoryProvider};
use stock_ta::models::Lookback;
use stock_ta::utils::logging;
use stock_ta::IndicatorError;

const USAGE: &str = "\
사용법:
  stock-ta symbols
  stock-ta indicators <SYMBOL> [지표목록|all] [30d|60d|90d|180d|1y|2y|max]
  stock-ta signal <SYMBOL> [SYMBOL...]
  stock-ta compare <SYMBOL,SYMBOL,...> [rsi,macd,bollinger]

데이터 디렉터리는 설정 파일(stock_ta.json) 또는 STOCK_TA__DATA__DATA_DIR 로 지정합니다.";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("오류: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

// 잘못된 입력(지표 이름, 기간, 파라미터)은 2, 그 외 실패는 1
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<IndicatorError>() {
        Some(e) if e.is_caller_error() => 2,
        _ => 1,
    }
}

async fn run() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load().context("설정 로드 실패")?;

    // 로깅 초기화
    logging::init(&config.logging.level);
    log::info!("stock-ta {} 시작", stock_ta::VERSION);

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let provider = Arc::new(CsvPriceProvider::new(&config.data.data_dir, config.data.delimiter_byte()));
    let service = AnalysisService::new(provider.clone(), config.clone());

    match command.as_str() {
        "symbols" => print_json(&provider.available_symbols())?,
        "indicators" => {
            let symbol = args.get(1).context("종목 코드가 필요합니다")?;
            let selection = match args.get(2) {
                Some(list) => IndicatorSelection::from_str(list)?,
                None => IndicatorSelection::All,
            };
            let lookback = match args.get(3) {
                Some(token) => token.parse::<Lookback>()?,
                None => config.data.default_lookback.parse::<Lookback>()?,
            };

            let report = service.indicators(symbol, lookback, &selection)?;
            print_json(&report)?;
        }
        "signal" => {
            let symbols: Vec<String> = args[1..].to_vec();
            match symbols.as_slice() {
                [] => bail!("종목 코드가 필요합니다\n\n{}", USAGE),
                [symbol] => print_json(&service.signal(symbol)?)?,
                _ => {
                    let mut reports = Vec::new();
                    for (symbol, result) in service.analyze_many(&symbols).await {
                        match result {
                            Ok(report) => reports.push(report),
                            Err(e) => log::warn!("{} 건너뜀: {}", symbol, e),
                        }
                    }
                    print_json(&reports)?;
                }
            }
        }
        "compare" => {
            let list = args.get(1).context("비교할 종목 목록이 필요합니다")?;
            let symbols: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            let kinds = match args.get(2) {
                Some(names) => names
                    .split(',')
                    .map(IndicatorKind::from_str)
                    .collect::<Result<Vec<_>, _>>()?,
                None => vec![IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::Bollinger],
            };

            print_json(&service.compare(&symbols, &kinds)?)?;
        }
        other => bail!("알 수 없는 명령: {}\n\n{}", other, USAGE),
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
