//! 공용 유틸리티
//!
//! 로깅, 수학 함수 제공

pub mod logging;
pub mod math;

pub use math::{round2, round_dp};
