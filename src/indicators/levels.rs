/**
* filename : levels
* author : HAMA
* date: 2025. 5. 11.
* description: rolling support / resistance
**/

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::models::PriceSeries;
use super::Indicator;
use super::moving_averages::{rolling_max, rolling_min};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levels {
  pub support: f64,
  pub resistance: f64,
}

/// Lowest low and highest high over the trailing window.
#[derive(Debug, Clone)]
pub struct SupportResistance {
  name: String,
  period: usize,
}

impl SupportResistance {
  pub fn new(period: usize) -> Self {
    SupportResistance {
      name: format!("SR-{}", period),
      period,
    }
  }
}

impl Indicator for SupportResistance {
  type Output = Levels;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    self.period.max(1)
  }

  fn calculate(&self, series: &PriceSeries) -> Result<Levels, SignalError> {
    self.ensure_history(series)?;

    let support = rolling_min(&series.lows(), self.period).last().copied().flatten();
    let resistance = rolling_max(&series.highs(), self.period).last().copied().flatten();

    match (support, resistance) {
      (Some(support), Some(resistance)) => Ok(Levels { support, resistance }),
      _ => Err(SignalError::insufficient(self.name(), self.min_periods(), series.len())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::PriceBar;
  use chrono::{Duration, FixedOffset, TimeZone};

  fn series(rows: &[(f64, f64)]) -> PriceSeries {
    let t0 = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
    let bars = rows
      .iter()
      .enumerate()
      .map(|(i, &(low, high))| {
        let mid = (low + high) / 2.0;
        PriceBar::new(t0 + Duration::minutes(i as i64), mid, high, low, mid)
      })
      .collect();
    PriceSeries::new(bars).unwrap()
  }

  #[test]
  fn test_levels_use_trailing_window_only() {
    let s = series(&[(1.0, 50.0), (9.0, 11.0), (8.0, 12.0), (10.0, 13.0)]);
    let levels = SupportResistance::new(3).calculate(&s).unwrap();
    assert_eq!(levels.support, 8.0);
    assert_eq!(levels.resistance, 13.0);
  }

  #[test]
  fn test_levels_need_full_window() {
    let s = series(&[(9.0, 11.0), (8.0, 12.0)]);
    let err = SupportResistance::new(3).calculate(&s).unwrap_err();
    assert!(matches!(err, SignalError::InsufficientHistory { required: 3, available: 2, .. }));
  }
}
