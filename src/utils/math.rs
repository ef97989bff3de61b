//! 수학 관련 유틸리티
//!
//! 반올림, 통계 함수 제공

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use statrs::statistics::Statistics;

/// Rounds to `dp` decimals, half-to-even on the exact binary value.
///
/// `2.675` is stored as `2.67499999...` and therefore rounds to `2.67`.
/// Non-finite input and values outside the decimal range are returned as is.
pub fn round_dp(value: f64, dp: u32) -> f64 {
  if !value.is_finite() {
    return value;
  }

  match Decimal::from_f64_retain(value) {
    Some(d) => d
      .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
      .to_f64()
      .unwrap_or(value),
    None => value,
  }
}

/// Display rounding used for every scalar in a decision.
pub fn round2(value: f64) -> f64 {
  round_dp(value, 2)
}

/// 평균 계산
pub fn average(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }

  Some(values.mean())
}

/// 표본 표준 편차 (n - 1)
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
  if values.len() < 2 {
    return None;
  }

  Some(values.std_dev())
}
