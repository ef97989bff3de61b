/**
* filename : snapshot
* author : HAMA
* date: 2025. 5. 12.
* description: every indicator evaluated once at the last bar
**/

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::SignalError;
use crate::models::PriceSeries;
use super::{
  AverageTrueRange, BollingerBands, Indicator, RelativeStrengthIndex, SupportResistance,
  TrendFilter, MACD,
};

/// Point-in-time indicator values for the last bar of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
  pub last_close: f64,
  pub support: f64,
  pub resistance: f64,
  pub rsi: Option<f64>,
  pub rsi_slope: Option<f64>,
  pub macd: f64,
  pub macd_signal: f64,
  pub macd_histogram_slope: f64,
  pub atr: f64,
  pub bb_upper: f64,
  pub bb_lower: f64,
  pub trend_up: bool,
  pub trend_down: bool,
}

/// The configured calculators the engine runs on every call.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
  pub levels: SupportResistance,
  pub rsi: RelativeStrengthIndex,
  pub macd: MACD,
  pub atr: AverageTrueRange,
  pub bollinger: BollingerBands,
  pub trend: TrendFilter,
}

impl IndicatorSet {
  pub fn new(config: &AnalyzerConfig) -> Self {
    IndicatorSet {
      levels: SupportResistance::new(config.window_sr),
      rsi: RelativeStrengthIndex::new(config.rsi_window),
      macd: MACD::default(),
      atr: AverageTrueRange::new(config.atr_window),
      bollinger: BollingerBands::new(config.bb_window, config.bb_std),
      trend: TrendFilter::default(),
    }
  }

  /// Bars needed before every indicator is defined at the last bar.
  pub fn min_history(&self) -> usize {
    [
      self.levels.min_periods(),
      self.rsi.min_periods(),
      self.macd.min_periods(),
      self.atr.min_periods(),
      self.bollinger.min_periods(),
      self.trend.min_periods(),
    ]
    .into_iter()
    .max()
    .unwrap_or(1)
  }

  pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, SignalError> {
    let required = self.min_history();
    if series.len() < required {
      return Err(SignalError::insufficient("indicator set", required, series.len()));
    }

    let last_close = series
      .last_close()
      .ok_or_else(|| SignalError::insufficient("indicator set", required, 0))?;

    let levels = self.levels.calculate(series)?;
    let rsi = self.rsi.calculate(series)?;
    let macd = self.macd.calculate(series)?;
    let atr = self.atr.calculate(series)?;
    let bands = self.bollinger.calculate(series)?;
    let trend = self.trend.calculate(series)?;

    let snapshot = IndicatorSnapshot {
      last_close,
      support: levels.support,
      resistance: levels.resistance,
      rsi: rsi.value,
      rsi_slope: rsi.slope,
      macd: macd.macd,
      macd_signal: macd.signal,
      macd_histogram_slope: macd.histogram_slope,
      atr,
      bb_upper: bands.upper,
      bb_lower: bands.lower,
      trend_up: trend.up,
      trend_down: trend.down,
    };

    log::debug!("Indicator snapshot: {:?}", snapshot);

    Ok(snapshot)
  }
}

impl Default for IndicatorSet {
  fn default() -> Self {
    IndicatorSet::new(&AnalyzerConfig::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_min_history_default_windows() {
    // RSI-14 needs 16 bars, the 20-bar windows need 20
    assert_eq!(IndicatorSet::default().min_history(), 20);

    let config = AnalyzerConfig { rsi_window: 30, ..AnalyzerConfig::default() };
    assert_eq!(IndicatorSet::new(&config).min_history(), 32);
  }
}
