//! 로깅 유틸리티
//!
//! 로그 초기화 및 분석 작업 로그 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::IndicatorError;

/// 레벨 문자열 파싱 (알 수 없는 값은 info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
///
/// RUST_LOG가 설정되어 있으면 그 값을, 없으면 설정 파일의 레벨을 사용합니다.
/// 이미 초기화된 경우 조용히 무시합니다.
pub fn init(configured_level: &str) {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| configured_level.to_string());

    let result = Builder::from_default_env()
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);
    }
}

/// 분석 시작 로그
pub fn log_analysis_start(symbol: &str, bars: usize) {
    log::info!("분석 시작: {} - 봉 {}개", symbol, bars);
}

/// 분석 종료 로그
pub fn log_analysis_end(symbol: &str, result: &str) {
    log::info!("분석 종료: {} - 결과: {}", symbol, result);
}

/// 오류 로그
pub fn log_error(context: &str, error: &IndicatorError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" warn "), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init("info");
        init("debug");
    }
}
