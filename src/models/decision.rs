use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::ChartSeries;
use crate::models::interval::Interval;
use crate::models::price_bar::PriceSeries;
use crate::signals::SignalType;

/// Output record of one engine invocation. Scalars are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDecision {
    pub signal: SignalType,
    pub confidence: f64,
    pub support: f64,
    pub resistance: f64,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub signal_line: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub current_price: f64,
    pub hold_minutes: u32,
}

impl SignalDecision {
    pub fn is_actionable(&self) -> bool {
        self.signal != SignalType::Hold
    }
}

/// What the presentation layer receives: the decision plus the data behind it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub interval: Interval,
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub decision: SignalDecision,
    pub bars: PriceSeries,
    pub chart: ChartSeries,
}
