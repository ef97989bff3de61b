/**
* filename : mod
* author : HAMA
* date: 2025. 5. 13.
* description: 신호 알림 전송
**/

pub mod http_sink;

pub use http_sink::HttpNotifier;

use async_trait::async_trait;

use crate::error::SignalError;
use crate::models::SignalDecision;

/// 알림 전송 인터페이스
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// `recipient` is the bare number; sinks add any prefix they need.
    async fn deliver(&self, recipient: &str, text: &str) -> Result<(), SignalError>;
}

/// Alert body, one field per line.
pub fn format_alert(symbol: &str, decision: &SignalDecision) -> String {
    let rsi = decision
        .rsi
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "➡ {} | {} | Confidence: {}\n\
         Close: {}\n\
         Support: {}\n\
         Resistance: {}\n\
         RSI: {}\n\
         MACD: {}\n\
         Signal Line: {}\n\
         BB Upper: {}\n\
         BB Lower: {}",
        decision.signal,
        symbol,
        decision.confidence,
        decision.current_price,
        decision.support,
        decision.resistance,
        rsi,
        decision.macd,
        decision.signal_line,
        decision.bb_upper,
        decision.bb_lower,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalType;

    #[test]
    fn test_format_alert() {
        let decision = SignalDecision {
            signal: SignalType::Sell,
            confidence: 0.6,
            support: 98.25,
            resistance: 104.5,
            rsi: Some(71.33),
            macd: 0.42,
            signal_line: 0.31,
            bb_upper: 105.1,
            bb_lower: 97.9,
            current_price: 104.75,
            hold_minutes: 20,
        };

        let text = format_alert("RELIANCE.NS", &decision);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "➡ SELL | RELIANCE.NS | Confidence: 0.6");
        assert_eq!(lines[1], "Close: 104.75");
        assert_eq!(lines[4], "RSI: 71.33");
        assert_eq!(lines[8], "BB Lower: 97.9");
    }

    #[test]
    fn test_format_alert_without_rsi() {
        let decision = SignalDecision {
            signal: SignalType::Buy,
            confidence: 0.55,
            support: 1.0,
            resistance: 2.0,
            rsi: None,
            macd: 0.0,
            signal_line: 0.0,
            bb_upper: 2.0,
            bb_lower: 1.0,
            current_price: 1.5,
            hold_minutes: 20,
        };
        assert!(format_alert("X", &decision).contains("RSI: N/A"));
    }
}
