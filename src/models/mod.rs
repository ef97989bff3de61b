pub mod decision;
pub mod interval;
pub mod price_bar;

pub use decision::{AnalysisReport, SignalDecision};
pub use interval::{parse_period_days, Interval};
pub use price_bar::{PriceBar, PriceSeries};
