/**
* filename : error
* author : HAMA
* date: 2025. 6. 2.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Input length mismatch: {left} ({left_len}) vs {right} ({right_len})")]
    InputMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Price series is not in strictly ascending date order at index {0}")]
    UnorderedSeries(usize),

    #[error("Data not found: {0}")]
    DataNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Background task failed: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl IndicatorError {
    pub fn mismatch(left: &'static str, left_len: usize, right: &'static str, right_len: usize) -> Self {
        IndicatorError::InputMismatch { left, left_len, right, right_len }
    }

    // 호출자 계약 위반 여부 (명령줄에서 종료 코드 2로 변환)
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            IndicatorError::InputMismatch { .. }
                | IndicatorError::InvalidParameter(_)
                | IndicatorError::UnknownIndicator(_)
                | IndicatorError::UnorderedSeries(_)
        )
    }
}

impl From<config::ConfigError> for IndicatorError {
    fn from(e: config::ConfigError) -> Self {
        IndicatorError::ConfigError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_error_classification() {
        assert!(IndicatorError::mismatch("high", 3, "close", 2).is_caller_error());
        assert!(IndicatorError::UnknownIndicator("ichimoku".into()).is_caller_error());
        assert!(IndicatorError::InvalidParameter("period".into()).is_caller_error());
        assert!(!IndicatorError::DataNotFound("AAPL".into()).is_caller_error());
        assert!(!IndicatorError::TaskError("cancelled".into()).is_caller_error());
    }
}
