use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Candle interval understood by the price providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    FourHours,
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
        }
    }

    pub fn candles_per_day(&self) -> u32 {
        match self {
            Interval::OneMinute => 1440,
            Interval::FiveMinutes => 288,
            Interval::FifteenMinutes => 96,
            Interval::ThirtyMinutes => 48,
            Interval::OneHour => 24,
            Interval::FourHours => 6,
            Interval::OneDay => 1,
        }
    }

    /// Days of history needed to cover `window * 2` candles.
    pub fn lookback_days(&self, window: usize) -> u64 {
        let needed = (window as u64).saturating_mul(2);
        let per_day = u64::from(self.candles_per_day());
        (needed.saturating_add(per_day - 1) / per_day).max(1)
    }

    /// Period string (e.g. `"5d"`) for the provider.
    pub fn min_period(&self, window: usize) -> String {
        format!("{}d", self.lookback_days(window))
    }
}

impl FromStr for Interval {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s.trim())
            .ok_or_else(|| SignalError::UnsupportedInterval(s.to_string()))
    }
}

impl TryFrom<String> for Interval {
    type Error = SignalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses a period string such as `"5d"` into a day count.
pub fn parse_period_days(period: &str) -> Result<u32, SignalError> {
    let trimmed = period.trim();
    let digits = trimmed
        .strip_suffix('d')
        .ok_or_else(|| SignalError::InvalidParameter(format!("period must end with 'd': {}", period)))?;

    match digits.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(SignalError::InvalidParameter(format!("invalid period: {}", period))),
    }
}
