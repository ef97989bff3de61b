/**
* filename : rules
* author : HAMA
* date: 2025. 5. 12.
* description: scoring weights and thresholds
**/

/// Weights and thresholds of the scoring function.
///
/// Fixed in production; tests build variants to probe single rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRules {
  /// Gate: ATR below this fraction of the last close means HOLD.
  pub quiet_atr_ratio: f64,
  pub quiet_confidence: f64,

  pub support_factor: f64,    // price <= support * factor
  pub resistance_factor: f64, // price >= resistance * factor
  pub levels_weight: f64,

  pub rsi_oversold: f64,
  pub rsi_overbought: f64,
  pub rsi_slope_threshold: f64,
  pub rsi_weight: f64,

  pub macd_histogram_slope_threshold: f64,
  pub macd_weight: f64,

  pub lower_band_factor: f64, // price < bb_lower * factor
  pub upper_band_factor: f64, // price > bb_upper * factor
  pub bollinger_weight: f64,

  /// Multiplier applied to a side that trades against the trend.
  pub trend_penalty: f64,
  /// Margin one side must clear before the decision leaves HOLD.
  pub hysteresis: f64,
  pub hold_minutes: u32,
}

impl Default for ScoringRules {
  fn default() -> Self {
    ScoringRules {
      quiet_atr_ratio: 0.0015,
      quiet_confidence: 0.5,

      support_factor: 1.005,
      resistance_factor: 0.995,
      levels_weight: 0.35,

      rsi_oversold: 35.0,
      rsi_overbought: 65.0,
      rsi_slope_threshold: 0.1,
      rsi_weight: 0.25,

      macd_histogram_slope_threshold: 0.01,
      macd_weight: 0.25,

      lower_band_factor: 1.005,
      upper_band_factor: 0.995,
      bollinger_weight: 0.2,

      trend_penalty: 0.6,
      hysteresis: 0.1,
      hold_minutes: 20,
    }
  }
}
