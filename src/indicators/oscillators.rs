/**
* filename : oscillators
* author : HAMA
* date: 2025. 5. 11.
* description: RSI with simple-average gains and losses
**/

use serde::{Deserialize, Serialize};

use crate::error::SignalError;
use crate::models::PriceSeries;
use super::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
  /// `None` when the window had neither gains nor losses.
  pub value: Option<f64>,
  /// Last RSI minus the previous one; `None` if either is undefined.
  pub slope: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RelativeStrengthIndex {
  name: String,
  period: usize,
}

impl RelativeStrengthIndex {
  pub fn new(period: usize) -> Self {
    RelativeStrengthIndex {
      name: format!("RSI-{}", period),
      period,
    }
  }

  pub fn period(&self) -> usize {
    self.period
  }

  /// RSI from average gain and average loss magnitude.
  ///
  /// A zero loss with positive gain is the limit value 100. Zero gain and
  /// zero loss has no defined RS and yields `None`.
  pub fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
      if avg_gain == 0.0 {
        return None;
      }
      return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));
    rsi.is_finite().then_some(rsi)
  }

  /// RSI per bar. The first `period` points are `None`.
  pub fn values(&self, closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if self.period == 0 || closes.len() <= self.period {
      return out;
    }

    // 종가 차이: deltas[j] = closes[j + 1] - closes[j]
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for i in self.period..closes.len() {
      let window = &deltas[i - self.period..i];
      let gain = window.iter().map(|d| d.max(0.0)).sum::<f64>() / self.period as f64;
      let loss = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / self.period as f64;
      out[i] = Self::from_averages(gain, loss);
    }

    out
  }
}

impl Indicator for RelativeStrengthIndex {
  type Output = RsiReading;

  fn name(&self) -> &str {
    &self.name
  }

  fn min_periods(&self) -> usize {
    // 차분 1개 + 기울기용 2개 지점
    self.period + 2
  }

  fn calculate(&self, series: &PriceSeries) -> Result<RsiReading, SignalError> {
    self.ensure_history(series)?;

    let values = self.values(&series.closes());
    let n = values.len();
    let value = values[n - 1];
    let slope = match (values[n - 1], values[n - 2]) {
      (Some(last), Some(prev)) => Some(last - prev),
      _ => None,
    };

    Ok(RsiReading { value, slope })
  }
}
