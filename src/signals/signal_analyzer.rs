/**
* filename : signal_analyzer
* author : HAMA
* date: 2025. 5. 11.
* description: quiet-market gate, weighted scoring, trend penalty, decision
**/

use crate::indicators::IndicatorSnapshot;
use crate::models::SignalDecision;
use crate::utils::math::round2;
use super::rules::ScoringRules;
use super::signal_types::{BandTouch, RuleOutcomes, SignalType, Vote};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scores {
  pub buy: f64,
  pub sell: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SignalAnalyzer {
  rules: ScoringRules,
}

impl SignalAnalyzer {
  pub fn new() -> Self {
    SignalAnalyzer::default()
  }

  pub fn with_rules(rules: ScoringRules) -> Self {
    SignalAnalyzer { rules }
  }

  // ATR가 종가 대비 너무 작으면 거래하지 않음
  pub fn is_quiet(&self, snapshot: &IndicatorSnapshot) -> bool {
    snapshot.atr < snapshot.last_close * self.rules.quiet_atr_ratio
  }

  pub fn levels_touch(&self, snapshot: &IndicatorSnapshot, price: f64) -> BandTouch {
    BandTouch {
      buy: price <= snapshot.support * self.rules.support_factor,
      sell: price >= snapshot.resistance * self.rules.resistance_factor,
    }
  }

  /// Undefined RSI or slope never votes.
  pub fn rsi_vote(&self, snapshot: &IndicatorSnapshot) -> Vote {
    let (rsi, slope) = match (snapshot.rsi, snapshot.rsi_slope) {
      (Some(rsi), Some(slope)) => (rsi, slope),
      _ => return Vote::Neutral,
    };

    let threshold = self.rules.rsi_slope_threshold;
    Vote::from_conditions(
      rsi < self.rules.rsi_oversold && slope > threshold,
      rsi > self.rules.rsi_overbought && slope < -threshold,
    )
  }

  pub fn macd_vote(&self, snapshot: &IndicatorSnapshot) -> Vote {
    let threshold = self.rules.macd_histogram_slope_threshold;
    let slope = snapshot.macd_histogram_slope;

    Vote::from_conditions(
      snapshot.macd > snapshot.macd_signal && slope > threshold,
      snapshot.macd < snapshot.macd_signal && slope < -threshold,
    )
  }

  pub fn bollinger_touch(&self, snapshot: &IndicatorSnapshot, price: f64) -> BandTouch {
    BandTouch {
      buy: price < snapshot.bb_lower * self.rules.lower_band_factor,
      sell: price > snapshot.bb_upper * self.rules.upper_band_factor,
    }
  }

  pub fn evaluate(&self, snapshot: &IndicatorSnapshot, price: f64) -> RuleOutcomes {
    RuleOutcomes {
      levels: self.levels_touch(snapshot, price),
      rsi: self.rsi_vote(snapshot),
      macd: self.macd_vote(snapshot),
      bollinger: self.bollinger_touch(snapshot, price),
    }
  }

  /// Raw weighted sums, accumulated in rule order.
  pub fn score(&self, outcomes: &RuleOutcomes) -> Scores {
    let mut scores = Scores::default();

    let add_touch = |touch: BandTouch, weight: f64, scores: &mut Scores| {
      if touch.buy {
        scores.buy += weight;
      }
      if touch.sell {
        scores.sell += weight;
      }
    };
    let add_vote = |vote: Vote, weight: f64, scores: &mut Scores| match vote {
      Vote::Buy => scores.buy += weight,
      Vote::Sell => scores.sell += weight,
      Vote::Neutral => {}
    };

    add_touch(outcomes.levels, self.rules.levels_weight, &mut scores);
    add_vote(outcomes.rsi, self.rules.rsi_weight, &mut scores);
    add_vote(outcomes.macd, self.rules.macd_weight, &mut scores);
    add_touch(outcomes.bollinger, self.rules.bollinger_weight, &mut scores);

    scores
  }

  /// Dampens each side once when the trend does not agree with it.
  pub fn apply_trend_penalty(&self, scores: Scores, trend_up: bool, trend_down: bool) -> Scores {
    let mut adjusted = scores;
    if adjusted.buy > 0.0 && !trend_up {
      adjusted.buy *= self.rules.trend_penalty;
    }
    if adjusted.sell > 0.0 && !trend_down {
      adjusted.sell *= self.rules.trend_penalty;
    }
    adjusted
  }

  /// Returns (signal, confidence, hold minutes). A side must lead by more
  /// than the hysteresis margin; an exact tie at the margin stays HOLD.
  pub fn decide(&self, scores: Scores) -> (SignalType, f64, u32) {
    let margin = self.rules.hysteresis;

    if scores.buy > scores.sell + margin {
      (SignalType::Buy, scores.buy, self.rules.hold_minutes)
    } else if scores.sell > scores.buy + margin {
      (SignalType::Sell, scores.sell, self.rules.hold_minutes)
    } else {
      (SignalType::Hold, scores.buy.max(scores.sell), 0)
    }
  }

  /// Builds the decision record from a snapshot that was computed once.
  pub fn generate(&self, snapshot: &IndicatorSnapshot, current_price: f64) -> SignalDecision {
    if self.is_quiet(snapshot) {
      log::debug!(
        "Quiet market: ATR {} < {} of close {}",
        snapshot.atr, self.rules.quiet_atr_ratio, snapshot.last_close
      );
      return SignalDecision {
        signal: SignalType::Hold,
        confidence: self.rules.quiet_confidence,
        support: round2(snapshot.support),
        resistance: round2(snapshot.resistance),
        rsi: snapshot.rsi.map(round2),
        macd: 0.0,
        signal_line: 0.0,
        bb_upper: round2(snapshot.bb_upper),
        bb_lower: round2(snapshot.bb_lower),
        current_price: round2(snapshot.last_close),
        hold_minutes: 0,
      };
    }

    let outcomes = self.evaluate(snapshot, current_price);
    let raw = self.score(&outcomes);
    let scores = self.apply_trend_penalty(raw, snapshot.trend_up, snapshot.trend_down);
    let (signal, confidence, hold_minutes) = self.decide(scores);

    log::debug!("Rule outcomes: {:?} - raw: {:?} - adjusted: {:?}", outcomes, raw, scores);

    SignalDecision {
      signal,
      confidence: round2(confidence),
      support: round2(snapshot.support),
      resistance: round2(snapshot.resistance),
      rsi: snapshot.rsi.map(round2),
      macd: round2(snapshot.macd),
      signal_line: round2(snapshot.macd_signal),
      bb_upper: round2(snapshot.bb_upper),
      bb_lower: round2(snapshot.bb_lower),
      current_price: round2(current_price),
      hold_minutes,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  fn neutral_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
      last_close: 100.0,
      support: 90.0,
      resistance: 110.0,
      rsi: Some(50.0),
      rsi_slope: Some(0.0),
      macd: 0.0,
      macd_signal: 0.0,
      macd_histogram_slope: 0.0,
      atr: 1.0,
      bb_upper: 108.0,
      bb_lower: 92.0,
      trend_up: true,
      trend_down: false,
    }
  }

  #[rstest]
  #[case(0.50, 0.40, SignalType::Hold, 0.50, 0)]
  #[case(0.51, 0.40, SignalType::Buy, 0.51, 20)]
  #[case(0.40, 0.51, SignalType::Sell, 0.51, 20)]
  #[case(0.40, 0.50, SignalType::Hold, 0.50, 0)]
  #[case(0.0, 0.0, SignalType::Hold, 0.0, 0)]
  fn test_decide_hysteresis(
    #[case] buy: f64,
    #[case] sell: f64,
    #[case] signal: SignalType,
    #[case] confidence: f64,
    #[case] hold: u32,
  ) {
    let analyzer = SignalAnalyzer::new();
    assert_eq!(analyzer.decide(Scores { buy, sell }), (signal, confidence, hold));
  }

  #[test]
  fn test_rsi_vote_buy_and_sell() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();

    snap.rsi = Some(30.0);
    snap.rsi_slope = Some(0.5);
    assert_eq!(analyzer.rsi_vote(&snap), Vote::Buy);

    snap.rsi_slope = Some(0.1);
    assert_eq!(analyzer.rsi_vote(&snap), Vote::Neutral);

    snap.rsi = Some(70.0);
    snap.rsi_slope = Some(-0.2);
    assert_eq!(analyzer.rsi_vote(&snap), Vote::Sell);
  }

  #[test]
  fn test_rsi_vote_absent_value_is_neutral() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();
    snap.rsi = None;
    snap.rsi_slope = None;
    assert_eq!(analyzer.rsi_vote(&snap), Vote::Neutral);

    snap.rsi = Some(20.0);
    assert_eq!(analyzer.rsi_vote(&snap), Vote::Neutral);
  }

  #[test]
  fn test_macd_vote() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();

    snap.macd = 0.5;
    snap.macd_signal = 0.3;
    snap.macd_histogram_slope = 0.02;
    assert_eq!(analyzer.macd_vote(&snap), Vote::Buy);

    // MACD above signal but histogram falling: no vote
    snap.macd_histogram_slope = -0.02;
    assert_eq!(analyzer.macd_vote(&snap), Vote::Neutral);

    snap.macd = 0.1;
    assert_eq!(analyzer.macd_vote(&snap), Vote::Sell);
  }

  #[test]
  fn test_band_rules_fire_independently() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();
    // collapsed range: price is at support and at resistance
    snap.support = 100.0;
    snap.resistance = 100.0;
    snap.bb_lower = 99.9;
    snap.bb_upper = 100.1;

    let outcomes = analyzer.evaluate(&snap, 100.0);
    assert_eq!(outcomes.levels, BandTouch { buy: true, sell: true });
    assert_eq!(outcomes.bollinger, BandTouch { buy: true, sell: true });

    let scores = analyzer.score(&outcomes);
    assert!((scores.buy - 0.55).abs() < 1e-12);
    assert!((scores.sell - 0.55).abs() < 1e-12);
  }

  #[test]
  fn test_trend_penalty_applied_once_per_side() {
    let analyzer = SignalAnalyzer::new();
    let scores = Scores { buy: 0.5, sell: 0.5 };

    let up = analyzer.apply_trend_penalty(scores, true, false);
    assert_eq!(up.buy, 0.5);
    assert!((up.sell - 0.3).abs() < 1e-12);

    let flat = analyzer.apply_trend_penalty(scores, false, false);
    assert!((flat.buy - 0.3).abs() < 1e-12);
    assert!((flat.sell - 0.3).abs() < 1e-12);

    let zero = analyzer.apply_trend_penalty(Scores::default(), false, false);
    assert_eq!(zero, Scores::default());
  }

  #[test]
  fn test_quiet_market_gate_zeroes_macd() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();
    snap.atr = 0.1;
    snap.macd = 3.0;
    snap.macd_signal = 1.0;
    snap.macd_histogram_slope = 1.0;
    snap.support = 100.0;

    let decision = analyzer.generate(&snap, 95.0);
    assert_eq!(decision.signal, SignalType::Hold);
    assert_eq!(decision.confidence, 0.5);
    assert_eq!(decision.macd, 0.0);
    assert_eq!(decision.signal_line, 0.0);
    assert_eq!(decision.hold_minutes, 0);
    assert_eq!(decision.current_price, 100.0);
    assert_eq!(decision.rsi, Some(50.0));
  }

  #[test]
  fn test_generate_buy_at_support_in_uptrend() {
    let analyzer = SignalAnalyzer::new();
    let mut snap = neutral_snapshot();
    snap.support = 99.8;
    snap.rsi = Some(30.0);
    snap.rsi_slope = Some(1.0);

    let decision = analyzer.generate(&snap, 100.0);
    assert_eq!(decision.signal, SignalType::Buy);
    assert_eq!(decision.confidence, 0.6);
    assert_eq!(decision.hold_minutes, 20);
  }

  #[test]
  fn test_custom_rules_change_threshold() {
    let rules = ScoringRules { hysteresis: 0.0, ..ScoringRules::default() };
    let analyzer = SignalAnalyzer::with_rules(rules);
    let (signal, _, _) = analyzer.decide(Scores { buy: 0.3, sell: 0.2 });
    assert_eq!(signal, SignalType::Buy);
  }
}
