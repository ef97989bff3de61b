/**
* filename : provider
* author : HAMA
* date: 2025. 5. 13.
* description: price history provider trait and shared bar helpers
**/

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};

use crate::error::SignalError;
use crate::models::{Interval, PriceBar, PriceSeries};

/// 가격 이력 제공자 인터페이스
///
/// Implementations normalise timestamps to their configured offset and fail
/// with `DataUnavailable` when the source has no rows.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `period` is a day count string such as `"5d"`.
    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        period: &str,
    ) -> Result<PriceSeries, SignalError>;
}

/// Parses `"+05:30"`, `"-04:00"`, `"Z"` or `"UTC"`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, SignalError> {
    let invalid = || SignalError::ConfigError(format!("Invalid UTC offset: {}", value));
    let trimmed = value.trim();

    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Epoch seconds to a timestamp in `offset`.
pub fn from_epoch_seconds(seconds: i64, offset: &FixedOffset) -> Result<DateTime<FixedOffset>, SignalError> {
    offset
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| SignalError::ParseError(format!("Invalid timestamp: {}", seconds)))
}

/// Sorts, drops repeated timestamps (the later row wins) and wraps the bars.
pub fn into_series(symbol: &str, mut bars: Vec<PriceBar>) -> Result<PriceSeries, SignalError> {
    if bars.is_empty() {
        return Err(SignalError::DataUnavailable(format!("No data retrieved for {}", symbol)));
    }

    bars.sort_by_key(|b| b.timestamp);
    let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        if let Some(last) = deduped.last_mut() {
            if last.timestamp == bar.timestamp {
                *last = bar;
                continue;
            }
        }
        deduped.push(bar);
    }

    PriceSeries::new(deduped)
}

/// Merges bars into buckets of `hours`, aligned to UTC midnight.
pub fn resample_hours(bars: &[PriceBar], hours: i64) -> Vec<PriceBar> {
    let bucket_secs = hours * 3600;
    let mut out: Vec<(i64, PriceBar)> = Vec::new();

    for bar in bars {
        let bucket = bar.timestamp.timestamp().div_euclid(bucket_secs);
        if let Some((key, agg)) = out.last_mut() {
            if *key == bucket {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume = match (agg.volume, bar.volume) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                };
                continue;
            }
        }
        out.push((bucket, bar.clone()));
    }

    out.into_iter().map(|(_, bar)| bar).collect()
}
