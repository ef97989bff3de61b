/**
* filename : signal_types
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final decision of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
  Buy,
  Sell,
  Hold,
}

impl SignalType {
  pub fn as_str(&self) -> &'static str {
    match self {
      SignalType::Buy => "BUY",
      SignalType::Sell => "SELL",
      SignalType::Hold => "HOLD",
    }
  }
}

impl fmt::Display for SignalType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Outcome of a rule pair where at most one side may fire (buy checked first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
  Buy,
  Sell,
  Neutral,
}

impl Vote {
  /// Buy side wins when both conditions hold.
  pub fn from_conditions(buy: bool, sell: bool) -> Self {
    if buy {
      Vote::Buy
    } else if sell {
      Vote::Sell
    } else {
      Vote::Neutral
    }
  }
}

/// Outcome of a rule pair whose sides are independent; both may fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTouch {
  pub buy: bool,
  pub sell: bool,
}

/// Per-indicator outcomes before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcomes {
  pub levels: BandTouch,
  pub rsi: Vote,
  pub macd: Vote,
  pub bollinger: BandTouch,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_vote_is_buy_first() {
    assert_eq!(Vote::from_conditions(true, true), Vote::Buy);
    assert_eq!(Vote::from_conditions(false, true), Vote::Sell);
    assert_eq!(Vote::from_conditions(false, false), Vote::Neutral);
  }

  #[test]
  fn test_signal_type_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&SignalType::Hold).unwrap(), "\"HOLD\"");
    assert_eq!(SignalType::Sell.to_string(), "SELL");
  }
}
