/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description: rolling windows and the two EMA conventions
**/

use crate::error::SignalError;
use crate::models::PriceSeries;
use crate::utils::math::{average, sample_std_dev};
use super::Indicator;

/// Applies `f` to every full trailing window. Leading points are `None`.
pub fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
  F: Fn(&[f64]) -> Option<f64>,
{
  if window == 0 {
    return vec![None; values.len()];
  }

  (0..values.len())
    .map(|i| {
      if i + 1 < window {
        None
      } else {
        f(&values[i + 1 - window..=i])
      }
    })
    .collect()
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
  rolling(values, window, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
  rolling(values, window, |w| w.iter().copied().reduce(f64::max))
}

/// Sample standard deviation (Bessel-corrected) per window.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
  rolling(values, window, sample_std_dev)
}

#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
  name: String,
  period: usize,
}

impl SimpleMovingAverage {
  pub fn new(period: usize) -> Self {
    SimpleMovingAverage {
      name: format!("SMA-{}", period),
      period,
    }
  }

  pub fn period(&self) -> usize {
    self.period
  }

  pub fn values(&self, data: &[f64]) -> Vec<Option<f64>> {
    rolling(data, self.period, average)
  }
}

impl Indicator for SimpleMovingAverage {
  type Output = f64;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    self.period
  }

  fn calculate(&self, series: &PriceSeries) -> Result<f64, SignalError> {
    self.ensure_history(series)?;

    self.values(&series.closes())
      .last()
      .copied()
      .flatten()
      .ok_or_else(|| SignalError::insufficient(self.name(), self.period, series.len()))
  }
}

/// EMA seeding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaMode {
  /// Seed with the first value, then `ema = a*x + (1-a)*prev`.
  Recursive,
  /// Exponentially weighted mean of every point since the start,
  /// normalised by the sum of weights.
  Adjusted,
}

#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
  name: String,
  alpha: f64,
  mode: EmaMode,
}

impl ExponentialMovingAverage {
  pub fn new(span: usize, mode: EmaMode) -> Self {
    let alpha = 2.0 / (span as f64 + 1.0);

    ExponentialMovingAverage {
      name: format!("EMA-{}", span),
      alpha,
      mode,
    }
  }

  pub fn recursive(span: usize) -> Self {
    Self::new(span, EmaMode::Recursive)
  }

  pub fn adjusted(span: usize) -> Self {
    Self::new(span, EmaMode::Adjusted)
  }

  pub fn values(&self, data: &[f64]) -> Vec<f64> {
    let decay = 1.0 - self.alpha;
    let mut out = Vec::with_capacity(data.len());

    match self.mode {
      EmaMode::Recursive => {
        let mut prev: Option<f64> = None;
        for &x in data {
          let ema = match prev {
            Some(p) => self.alpha * x + decay * p,
            None => x,
          };
          out.push(ema);
          prev = Some(ema);
        }
      }
      EmaMode::Adjusted => {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for &x in data {
          numerator = x + decay * numerator;
          denominator = 1.0 + decay * denominator;
          out.push(numerator / denominator);
        }
      }
    }

    out
  }
}

impl Indicator for ExponentialMovingAverage {
  type Output = f64;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    1
  }

  fn calculate(&self, series: &PriceSeries) -> Result<f64, SignalError> {
    self.ensure_history(series)?;

    self.values(&series.closes())
      .last()
      .copied()
      .ok_or_else(|| SignalError::insufficient(self.name(), 1, 0))
  }
}
