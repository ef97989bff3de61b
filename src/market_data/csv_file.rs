/**
* filename : csv_file
* author : HAMA
* date: 2025. 5. 13.
* description: CSV 파일 기반 가격 이력 제공자 (오프라인 분석/테스트용)
**/

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::SignalError;
use crate::market_data::provider::{from_epoch_seconds, into_series, parse_utc_offset, PriceHistoryProvider};
use crate::models::{parse_period_days, Interval, PriceBar, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    symbol: Option<String>,
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Reads bars from a single CSV file.
///
/// The file is assumed to already hold bars at the requested interval. When a
/// `symbol` column is present only matching rows are kept.
pub struct CsvPriceProvider {
    path: PathBuf,
    offset: FixedOffset,
}

impl CsvPriceProvider {
    pub fn new(path: PathBuf, utc_offset: &str) -> Result<Self, SignalError> {
        Ok(Self {
            path,
            offset: parse_utc_offset(utc_offset)?,
        })
    }

    fn parse_timestamp(&self, raw: &str) -> Result<DateTime<FixedOffset>, SignalError> {
        let raw = raw.trim();
        if let Ok(seconds) = raw.parse::<i64>() {
            return from_epoch_seconds(seconds, &self.offset);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&self.offset))
            .map_err(|e| SignalError::ParseError(format!("Invalid timestamp '{}': {}", raw, e)))
    }

    fn load(&self, symbol: &str) -> Result<Vec<PriceBar>, SignalError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(io) => SignalError::IoError(io),
                other => SignalError::ParseError(format!("{:?}", other)),
            })?;

        let mut bars = Vec::new();
        for rec in rdr.deserialize() {
            let row: CsvRow = rec.map_err(|e| SignalError::ParseError(e.to_string()))?;
            if let Some(row_symbol) = &row.symbol {
                if !row_symbol.eq_ignore_ascii_case(symbol) {
                    continue;
                }
            }

            let mut bar = PriceBar::new(
                self.parse_timestamp(&row.timestamp)?,
                row.open,
                row.high,
                row.low,
                row.close,
            );
            if let Some(volume) = row.volume {
                bar = bar.with_volume(volume);
            }
            bars.push(bar);
        }
        Ok(bars)
    }
}

/// Keeps bars no older than `days` before the newest bar.
fn trailing_days(mut bars: Vec<PriceBar>, days: u32) -> Vec<PriceBar> {
    let newest = match bars.iter().map(|b| b.timestamp).max() {
        Some(ts) => ts,
        None => return bars,
    };
    let cutoff = newest - Duration::days(i64::from(days));
    bars.retain(|b| b.timestamp > cutoff);
    bars
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceProvider {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        period: &str,
    ) -> Result<PriceSeries, SignalError> {
        let days = parse_period_days(period)?;
        let bars = trailing_days(self.load(symbol)?, days);
        debug!("{} {} CSV 봉 {}개 ({})", symbol, interval, bars.len(), self.path.display());
        into_series(symbol, bars)
    }
}
