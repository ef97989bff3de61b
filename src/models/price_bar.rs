use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// One OHLC observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PriceBar {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Ordered, immutable price history handed to the engine.
///
/// Construction checks that every price is positive and finite and that
/// timestamps are strictly increasing. Gaps between bars are allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SignalError> {
        if let Some(bad) = bars.iter().position(|b| !b.is_valid()) {
            return Err(SignalError::InvalidSeries(format!(
                "bar {} has a non-positive or non-finite price",
                bad
            )));
        }

        if let Some(i) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(SignalError::InvalidSeries(format!(
                "timestamps not strictly increasing at bar {}",
                i + 1
            )));
        }

        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar(minutes: i64, close: f64) -> PriceBar {
        let t0 = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
        PriceBar::new(t0 + Duration::minutes(minutes), close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn test_series_accepts_gaps() {
        let series = PriceSeries::new(vec![bar(0, 10.0), bar(1, 11.0), bar(30, 12.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_close(), Some(12.0));
        assert_eq!(series.highs(), vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let result = PriceSeries::new(vec![bar(5, 10.0), bar(5, 11.0)]);
        assert!(matches!(result, Err(SignalError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_non_positive_prices() {
        let mut bad = bar(1, 10.0);
        bad.low = 0.0;
        let result = PriceSeries::new(vec![bar(0, 10.0), bad]);
        assert!(matches!(result, Err(SignalError::InvalidSeries(_))));
    }
}
