/**
* filename : chart
* author : HAMA
* date: 2025. 5. 12.
* description: per-bar indicator lines for the dashboard overlays
**/

use serde::{Deserialize, Serialize};

use crate::models::PriceSeries;
use super::IndicatorSet;

/// One value per bar; `None` where the indicator is not yet defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
  pub rsi: Vec<Option<f64>>,
  pub macd: Vec<f64>,
  pub signal_line: Vec<f64>,
  pub histogram: Vec<f64>,
  pub bb_upper: Vec<Option<f64>>,
  pub bb_lower: Vec<Option<f64>>,
}

impl ChartSeries {
  pub fn compute(indicators: &IndicatorSet, series: &PriceSeries) -> Self {
    let closes = series.closes();
    let macd = indicators.macd.lines(&closes);
    let bands = indicators.bollinger.values(&closes);

    ChartSeries {
      rsi: indicators.rsi.values(&closes),
      macd: macd.macd,
      signal_line: macd.signal,
      histogram: macd.histogram,
      bb_upper: bands.iter().map(|b| b.map(|b| b.upper)).collect(),
      bb_lower: bands.iter().map(|b| b.map(|b| b.lower)).collect(),
    }
  }

  pub fn len(&self) -> usize {
    self.macd.len()
  }

  pub fn is_empty(&self) -> bool {
    self.macd.is_empty()
  }
}
