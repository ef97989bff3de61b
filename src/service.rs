/**
* filename : service
* author : HAMA
* date: 2025. 5. 14.
* description: 가격 조회 -> 신호 분석 -> 알림 전송 흐름
**/

use chrono::Utc;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::NotificationConfig;
use crate::engine::TechnicalAnalyzer;
use crate::error::SignalError;
use crate::market_data::PriceHistoryProvider;
use crate::models::{parse_period_days, AnalysisReport, Interval};
use crate::notification::{format_alert, NotificationSink};
use crate::utils::logging;

/// Orchestrates one analysis: fetch, decide, alert.
///
/// Cheap to clone; the provider and sink are shared.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn PriceHistoryProvider>,
    notifier: Option<Arc<dyn NotificationSink>>,
    analyzer: Arc<TechnicalAnalyzer>,
    notification: NotificationConfig,
}

impl AnalysisService {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        analyzer: TechnicalAnalyzer,
        notification: NotificationConfig,
    ) -> Self {
        Self {
            provider,
            notifier: None,
            analyzer: Arc::new(analyzer),
            notification,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn analyzer(&self) -> &TechnicalAnalyzer {
        &self.analyzer
    }

    /// Period used when the caller gives none: twice the largest window,
    /// doubled again into candles.
    pub fn default_period(&self, interval: Interval) -> String {
        interval.min_period(self.analyzer.max_window().saturating_mul(2))
    }

    pub async fn analyze(
        &self,
        symbol: &str,
        interval: Interval,
        period: Option<&str>,
    ) -> Result<AnalysisReport, SignalError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(SignalError::InvalidParameter("symbol must not be empty".to_string()));
        }

        let period = match period {
            Some(p) => {
                parse_period_days(p)?;
                p.trim().to_string()
            }
            None => self.default_period(interval),
        };
        logging::log_analysis_start(symbol, interval.as_str(), &period);

        let bars = self.provider.fetch(symbol, interval, &period).await?;
        debug!("{}: {} bars from {}", symbol, bars.len(), self.provider.name());

        let decision = self.analyzer.generate_latest(&bars)?;
        let chart = self.analyzer.chart(&bars);
        logging::log_decision(symbol, &decision);

        let report = AnalysisReport {
            symbol: symbol.to_string(),
            interval,
            period,
            generated_at: Utc::now(),
            decision,
            bars,
            chart,
        };

        self.notify(&report).await;
        Ok(report)
    }

    /// Interval given as text, e.g. from a query string or the command line.
    pub async fn analyze_str(
        &self,
        symbol: &str,
        interval: &str,
        period: Option<&str>,
    ) -> Result<AnalysisReport, SignalError> {
        let interval: Interval = interval.parse()?;
        self.analyze(symbol, interval, period).await
    }

    /// Sends the alert if it clears the threshold. Delivery errors are logged
    /// and never reach the caller.
    async fn notify(&self, report: &AnalysisReport) {
        if !self.notification.enabled {
            return;
        }
        let (notifier, recipient) = match (&self.notifier, &self.notification.recipient) {
            (Some(n), Some(r)) if !r.trim().is_empty() => (n, r),
            _ => return,
        };
        if report.decision.confidence <= self.notification.min_confidence {
            debug!(
                "{}: confidence {} below alert threshold {}",
                report.symbol, report.decision.confidence, self.notification.min_confidence
            );
            return;
        }

        let text = format_alert(&report.symbol, &report.decision);
        match notifier.deliver(recipient, &text).await {
            Ok(()) => info!("{}: alert sent ({})", report.symbol, report.decision.signal),
            Err(e) => warn!("{}: alert not delivered: {}", report.symbol, e),
        }
    }

    /// Re-runs the analysis every `every` until Ctrl-C.
    pub async fn watch(&self, symbol: &str, interval: Interval, every: Duration) {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.watch_until(symbol, interval, every, shutdown).await;
    }

    /// Returns the number of completed runs once `shutdown` resolves.
    pub async fn watch_until<F>(
        &self,
        symbol: &str,
        interval: Interval,
        every: Duration,
        shutdown: F,
    ) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut runs = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Watch stopped for {} after {} runs", symbol, runs);
                    return runs;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.analyze(symbol, interval, None).await {
                        logging::log_error(symbol, &e);
                    }
                    runs += 1;
                }
            }
        }
    }
}
