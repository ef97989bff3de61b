/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/
pub mod chart;
pub mod levels;
pub mod moving_averages;
pub mod oscillators;
pub mod snapshot;
pub mod trend;
pub mod volatility;

pub use chart::ChartSeries;
pub use levels::{Levels, SupportResistance};
pub use moving_averages::{EmaMode, ExponentialMovingAverage, SimpleMovingAverage};
pub use oscillators::{RelativeStrengthIndex, RsiReading};
pub use snapshot::{IndicatorSet, IndicatorSnapshot};
pub use trend::{MacdLines, MacdReading, TrendFilter, TrendReading, MACD};
pub use volatility::{AverageTrueRange, BollingerBands, BollingerReading};

use std::fmt::Debug;

use crate::error::SignalError;
use crate::models::PriceSeries;

/// A calculator over a whole price series, reporting its value at the last bar.
pub trait Indicator: Debug + Send + Sync {
  type Output;

  fn name(&self) -> &str;

  // 마지막 바의 값을 정의하는 데 필요한 최소 바 개수
  fn min_periods(&self) -> usize;

  fn calculate(&self, series: &PriceSeries) -> Result<Self::Output, SignalError>;

  fn ensure_history(&self, series: &PriceSeries) -> Result<(), SignalError> {
    if series.len() < self.min_periods() {
      return Err(SignalError::insufficient(self.name(), self.min_periods(), series.len()));
    }
    Ok(())
  }
}
