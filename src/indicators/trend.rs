/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description: MACD and the EMA50/EMA200 trend filter
**/

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::models::PriceSeries;
use super::{Indicator, moving_averages::ExponentialMovingAverage};

/// Full MACD lines, one point per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
  pub macd: Vec<f64>,
  pub signal: Vec<f64>,
  pub histogram: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
  pub macd: f64,
  pub signal: f64,
  pub histogram: f64,
  pub histogram_slope: f64,
}

#[derive(Debug, Clone)]
pub struct MACD {
  name: String,
  fast_ema: ExponentialMovingAverage,
  slow_ema: ExponentialMovingAverage,
  signal_ema: ExponentialMovingAverage,
}

impl MACD {
  pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
    MACD {
      name: format!("MACD-{}-{}-{}", fast_period, slow_period, signal_period),
      fast_ema: ExponentialMovingAverage::recursive(fast_period),
      slow_ema: ExponentialMovingAverage::recursive(slow_period),
      signal_ema: ExponentialMovingAverage::recursive(signal_period),
    }
  }

  pub fn lines(&self, closes: &[f64]) -> MacdLines {
    let fast = self.fast_ema.values(closes);
    let slow = self.slow_ema.values(closes);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    // 시그널 라인은 MACD 라인에 같은 재귀식 적용
    let signal = self.signal_ema.values(&macd);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdLines { macd, signal, histogram }
  }
}

impl Default for MACD {
  fn default() -> Self {
    MACD::new(12, 26, 9)
  }
}

impl Indicator for MACD {
  type Output = MacdReading;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    2
  }

  fn calculate(&self, series: &PriceSeries) -> Result<MacdReading, SignalError> {
    self.ensure_history(series)?;

    let lines = self.lines(&series.closes());
    let n = lines.histogram.len();

    Ok(MacdReading {
      macd: lines.macd[n - 1],
      signal: lines.signal[n - 1],
      histogram: lines.histogram[n - 1],
      histogram_slope: lines.histogram[n - 1] - lines.histogram[n - 2],
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
  pub fast_ema: f64,
  pub slow_ema: f64,
  pub up: bool,
  pub down: bool,
}

/// Fast vs. slow adjusted EMA of close.
#[derive(Debug, Clone)]
pub struct TrendFilter {
  name: String,
  fast_ema: ExponentialMovingAverage,
  slow_ema: ExponentialMovingAverage,
}

impl TrendFilter {
  pub fn new(fast_span: usize, slow_span: usize) -> Self {
    TrendFilter {
      name: format!("Trend-{}/{}", fast_span, slow_span),
      fast_ema: ExponentialMovingAverage::adjusted(fast_span),
      slow_ema: ExponentialMovingAverage::adjusted(slow_span),
    }
  }
}

impl Default for TrendFilter {
  fn default() -> Self {
    TrendFilter::new(50, 200)
  }
}

impl Indicator for TrendFilter {
  type Output = TrendReading;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    1
  }

  fn calculate(&self, series: &PriceSeries) -> Result<TrendReading, SignalError> {
    self.ensure_history(series)?;

    let closes = series.closes();
    let fast = self.fast_ema.values(&closes);
    let slow = self.slow_ema.values(&closes);

    let (fast_ema, slow_ema) = match (fast.last(), slow.last()) {
      (Some(&f), Some(&s)) => (f, s),
      _ => return Err(SignalError::insufficient(self.name(), 1, series.len())),
    };

    Ok(TrendReading {
      fast_ema,
      slow_ema,
      up: fast_ema > slow_ema,
      down: fast_ema < slow_ema,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_macd_flat_input_is_zero() {
    let lines = MACD::default().lines(&[100.0; 40]);
    assert!(lines.macd.iter().all(|v| v.abs() < 1e-12));
    assert!(lines.histogram.iter().all(|v| v.abs() < 1e-12));
  }

  #[test]
  fn test_macd_first_step_by_hand() {
    // spans 3/7/3 -> alphas 0.5 / 0.25 / 0.5
    let macd = MACD::new(3, 7, 3);
    let lines = macd.lines(&[10.0, 14.0]);
    // fast 12.0, slow 11.0 -> macd 1.0; signal 0 + 0.5 * 1 = 0.5
    assert!((lines.macd[1] - 1.0).abs() < 1e-12);
    assert!((lines.signal[1] - 0.5).abs() < 1e-12);
    assert!((lines.histogram[1] - 0.5).abs() < 1e-12);
  }

  #[test]
  fn test_macd_rises_with_accelerating_prices() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64).powi(2) * 0.01).collect();
    let lines = MACD::default().lines(&closes);
    assert!(lines.macd[59] > 0.0);
    assert!(lines.macd[59] > lines.signal[59]);
  }
}
