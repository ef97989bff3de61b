/**
* filename : yahoo
* author : HAMA
* date: 2025. 5. 13.
* description: Yahoo Finance v8 chart 엔드포인트 기반 가격 이력 제공자
**/

use async_trait::async_trait;
use chrono::FixedOffset;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::MarketDataConfig;
use crate::error::SignalError;
use crate::market_data::provider::{
    from_epoch_seconds, into_series, parse_utc_offset, resample_hours, PriceHistoryProvider,
};
use crate::models::{Interval, PriceBar, PriceSeries};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo chart API client
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    offset: FixedOffset,
}

impl YahooChartProvider {
    pub fn new(config: &MarketDataConfig) -> Result<Self, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &MarketDataConfig) -> Result<Self, SignalError> {
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            offset: parse_utc_offset(&config.utc_offset)?,
        })
    }

    /// Yahoo has no 4h bars; those are built from 1h.
    fn request_interval(interval: Interval) -> &'static str {
        match interval {
            Interval::FourHours => Interval::OneHour.as_str(),
            other => other.as_str(),
        }
    }

    fn chart_url(&self, symbol: &str, interval: Interval, period: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            symbol.to_uppercase(),
            period,
            Self::request_interval(interval)
        )
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooChartProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        period: &str,
    ) -> Result<PriceSeries, SignalError> {
        let url = self.chart_url(symbol, interval, period);
        debug!("Yahoo 차트 요청: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // 404 는 존재하지 않는 심볼
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SignalError::DataUnavailable(format!("No data retrieved for {}", symbol)));
        }
        if !status.is_success() {
            warn!("Yahoo 응답 오류 {}: {}", symbol, status);
            return Err(SignalError::DataUnavailable(format!(
                "Yahoo returned {} for {}",
                status, symbol
            )));
        }

        let mut bars = parse_chart(&body, symbol, &self.offset)?;
        if interval == Interval::FourHours {
            bars = resample_hours(&bars, 4);
        }
        debug!("{} {} 봉 {}개 수신", symbol, interval, bars.len());

        into_series(symbol, bars)
    }
}

/// Turns a chart response body into bars, skipping rows with a missing
/// or non-positive price.
fn parse_chart(body: &str, symbol: &str, offset: &FixedOffset) -> Result<Vec<PriceBar>, SignalError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| SignalError::ParseError(format!("Yahoo chart for {}: {}", symbol, e)))?;

    if let Some(error) = response.chart.error {
        return Err(SignalError::DataUnavailable(format!(
            "{}: {} - {}",
            symbol, error.code, error.description
        )));
    }

    let result = match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |values: &Vec<Option<f64>>| values.get(i).copied().flatten();
        let (open, high, low, close) = match (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        if [open, high, low, close].iter().any(|p| !(p.is_finite() && *p > 0.0)) {
            continue;
        }

        let mut bar = PriceBar::new(from_epoch_seconds(ts, offset)?, open, high, low, close);
        if let Some(volume) = field(&quote.volume) {
            bar = bar.with_volume(volume);
        }
        bars.push(bar);
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "RELIANCE.NS" },
                "timestamp": [1743480000, 1743480900, 1743481800],
                "indicators": { "quote": [{
                    "open":   [100.0, null, 101.0],
                    "high":   [101.0, 102.0, 102.5],
                    "low":    [99.5, 100.5, 100.0],
                    "close":  [100.5, 101.5, 102.0],
                    "volume": [1000, 1500, null]
                }]}
            }],
            "error": null
        }
    }"#;

    fn ist() -> FixedOffset {
        parse_utc_offset("+05:30").unwrap()
    }

    #[test]
    fn test_parse_chart_skips_incomplete_rows() {
        let bars = parse_chart(BODY, "RELIANCE.NS", &ist()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[0].volume, Some(1000.0));
        assert_eq!(bars[1].close, 102.0);
        assert_eq!(bars[1].volume, None);
        assert_eq!(bars[0].timestamp.offset().local_minus_utc(), 19800);
        assert_eq!(bars[0].timestamp.timestamp(), 1743480000);
    }

    #[test]
    fn test_parse_chart_error_is_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(body, "NOPE", &ist()).unwrap_err();
        assert!(matches!(err, SignalError::DataUnavailable(_)));
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let bars = parse_chart(body, "EMPTY", &ist()).unwrap();
        assert!(bars.is_empty());
        assert!(matches!(into_series("EMPTY", bars), Err(SignalError::DataUnavailable(_))));
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        assert!(matches!(parse_chart("<html>", "X", &ist()), Err(SignalError::ParseError(_))));
    }

    #[test]
    fn test_chart_url() {
        let provider = YahooChartProvider::with_client(Client::new(), &MarketDataConfig::default()).unwrap();
        assert_eq!(
            provider.chart_url("reliance.ns", Interval::FourHours, "67d"),
            "https://query1.finance.yahoo.com/v8/finance/chart/RELIANCE.NS?range=67d&interval=1h&includePrePost=false"
        );
    }
}
