//! 공용 유틸리티
//!
//! 로깅 초기화와 수치 보조 함수

pub mod logging;
pub mod math;
