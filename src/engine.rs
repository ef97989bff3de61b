/**
* filename : engine
* author : HAMA
* date: 2025. 5. 12.
* description: indicator set + signal analyzer, one decision per call
**/

use crate::config::AnalyzerConfig;
use crate::error::SignalError;
use crate::indicators::{ChartSeries, IndicatorSet, IndicatorSnapshot};
use crate::models::{PriceSeries, SignalDecision};
use crate::signals::{ScoringRules, SignalAnalyzer};

/// Stateless signal engine. Holds configuration only, so one instance can
/// serve any number of series concurrently.
#[derive(Debug, Clone)]
pub struct TechnicalAnalyzer {
    config: AnalyzerConfig,
    indicators: IndicatorSet,
    analyzer: SignalAnalyzer,
}

impl TechnicalAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, SignalError> {
        config.validate()?;
        let indicators = IndicatorSet::new(&config);

        Ok(TechnicalAnalyzer {
            config,
            indicators,
            analyzer: SignalAnalyzer::new(),
        })
    }

    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.analyzer = SignalAnalyzer::with_rules(rules);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// Window the fetch period must cover (trend filter included).
    pub fn max_window(&self) -> usize {
        self.config.max_window()
    }

    /// Bars needed before the last bar's indicators are all defined.
    pub fn min_history(&self) -> usize {
        self.indicators.min_history()
    }

    pub fn snapshot(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, SignalError> {
        self.indicators.compute(series)
    }

    pub fn generate_signal(
        &self,
        series: &PriceSeries,
        current_price: f64,
    ) -> Result<SignalDecision, SignalError> {
        if !(current_price.is_finite() && current_price > 0.0) {
            return Err(SignalError::InvalidParameter(format!(
                "current price must be positive, got {}",
                current_price
            )));
        }

        let snapshot = self.snapshot(series)?;
        Ok(self.analyzer.generate(&snapshot, current_price))
    }

    /// Uses the last close as the current price.
    pub fn generate_latest(&self, series: &PriceSeries) -> Result<SignalDecision, SignalError> {
        let price = series
            .last_close()
            .ok_or_else(|| SignalError::insufficient("series", self.min_history(), 0))?;
        self.generate_signal(series, price)
    }

    pub fn chart(&self, series: &PriceSeries) -> ChartSeries {
        ChartSeries::compute(&self.indicators, series)
    }
}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        let config = AnalyzerConfig::default();
        TechnicalAnalyzer {
            indicators: IndicatorSet::new(&config),
            config,
            analyzer: SignalAnalyzer::new(),
        }
    }
}
