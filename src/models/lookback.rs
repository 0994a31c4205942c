use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

/// 조회 기간 (30d, 60d, 90d, 180d, 1y, 2y, max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lookback {
    Days30,
    Days60,
    Days90,
    Days180,
    Year1,
    Year2,
    Max,
}

impl Lookback {
    pub fn days(&self) -> Option<i64> {
        match self {
            Lookback::Days30 => Some(30),
            Lookback::Days60 => Some(60),
            Lookback::Days90 => Some(90),
            Lookback::Days180 => Some(180),
            Lookback::Year1 => Some(365),
            Lookback::Year2 => Some(730),
            Lookback::Max => None,
        }
    }

    /// 기준일로부터 시작일 계산 (max는 None)
    pub fn start_date(&self, end: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|d| end - Duration::days(d))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lookback::Days30 => "30d",
            Lookback::Days60 => "60d",
            Lookback::Days90 => "90d",
            Lookback::Days180 => "180d",
            Lookback::Year1 => "1y",
            Lookback::Year2 => "2y",
            Lookback::Max => "max",
        }
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Lookback::Days90
    }
}

impl FromStr for Lookback {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "30d" => Ok(Lookback::Days30),
            "60d" => Ok(Lookback::Days60),
            "90d" => Ok(Lookback::Days90),
            "180d" => Ok(Lookback::Days180),
            "1y" => Ok(Lookback::Year1),
            "2y" => Ok(Lookback::Year2),
            "max" => Ok(Lookback::Max),
            other => Err(IndicatorError::InvalidParameter(format!("unknown lookback period: {}", other))),
        }
    }
}

impl TryFrom<String> for Lookback {
    type Error = IndicatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("30d", Some(30))]
    #[case("90D", Some(90))]
    #[case("1y", Some(365))]
    #[case("2y", Some(730))]
    #[case("max", None)]
    fn test_parse_lookback(#[case] input: &str, #[case] days: Option<i64>) {
        let lookback: Lookback = input.parse().unwrap();
        assert_eq!(lookback.days(), days);
    }

    #[test]
    fn test_unknown_lookback_rejected() {
        assert!("7w".parse::<Lookback>().is_err());
    }

    #[test]
    fn test_start_date() {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            Lookback::Days30.start_date(end),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(Lookback::Max.start_date(end), None);
    }
}
