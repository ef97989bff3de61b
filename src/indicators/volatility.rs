/**
* filename : volatility
* author : HAMA
* date: 2025. 5. 12.
* description: ATR and Bollinger Bands
**/

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::models::{PriceBar, PriceSeries};
use super::Indicator;
use super::moving_averages::{rolling, rolling_std, SimpleMovingAverage};
use crate::utils::math::average;

#[derive(Debug, Clone)]
pub struct AverageTrueRange {
  name: String,
  period: usize,
}

impl AverageTrueRange {
  pub fn new(period: usize) -> Self {
    AverageTrueRange {
      name: format!("ATR-{}", period),
      period,
    }
  }

  /// True range per bar. The first bar has no previous close, so its range
  /// is `high - low` and it stays in the averaging window.
  pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars
      .iter()
      .enumerate()
      .map(|(i, bar)| {
        let high_low = bar.high - bar.low;
        match i.checked_sub(1).map(|p| bars[p].close) {
          Some(prev_close) => high_low
            .max((bar.high - prev_close).abs())
            .max((bar.low - prev_close).abs()),
          None => high_low,
        }
      })
      .collect()
  }

  pub fn values(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
    rolling(&Self::true_ranges(bars), self.period, average)
  }
}

impl Indicator for AverageTrueRange {
  type Output = f64;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    self.period.max(1)
  }

  fn calculate(&self, series: &PriceSeries) -> Result<f64, SignalError> {
    self.ensure_history(series)?;

    self.values(series.bars())
      .last()
      .copied()
      .flatten()
      .ok_or_else(|| SignalError::insufficient(self.name(), self.min_periods(), series.len()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
  pub middle: f64,
  pub upper: f64,
  pub lower: f64,
}

#[derive(Debug, Clone)]
pub struct BollingerBands {
  name: String,
  sma: SimpleMovingAverage,
  multiplier: f64,
}

impl BollingerBands {
  pub fn new(period: usize, multiplier: f64) -> Self {
    BollingerBands {
      name: format!("BB-{}-{}", period, multiplier),
      sma: SimpleMovingAverage::new(period),
      multiplier,
    }
  }

  pub fn values(&self, closes: &[f64]) -> Vec<Option<BollingerReading>> {
    let middle = self.sma.values(closes);
    let std = rolling_std(closes, self.sma.period());

    middle
      .into_iter()
      .zip(std)
      .map(|(m, s)| match (m, s) {
        (Some(middle), Some(std)) => Some(BollingerReading {
          middle,
          upper: middle + std * self.multiplier,
          lower: middle - std * self.multiplier,
        }),
        _ => None,
      })
      .collect()
  }
}

impl Indicator for BollingerBands {
  type Output = BollingerReading;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    // 표본 표준편차는 최소 2개 필요
    self.sma.period().max(2)
  }

  fn calculate(&self, series: &PriceSeries) -> Result<BollingerReading, SignalError> {
    self.ensure_history(series)?;

    self.values(&series.closes())
      .last()
      .copied()
      .flatten()
      .ok_or_else(|| SignalError::insufficient(self.name(), self.min_periods(), series.len()))
  }
}
