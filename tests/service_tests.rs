//! 분석 서비스 통합 테스트
//!
//! 가격 제공자와 알림 전송을 mockall 로 대체하여 조회 -> 분석 -> 알림 흐름 검증

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone};
use mockall::mock;
use mockall::predicate::{always, eq, function};

use xsignal::config::NotificationConfig;
use xsignal::{
  Interval, NotificationSink, PriceBar, PriceHistoryProvider, PriceSeries, SignalError, SignalType,
  TechnicalAnalyzer,
};
use xsignal::AnalysisService;

mock! {
  pub Provider {}

  #[async_trait]
  impl PriceHistoryProvider for Provider {
    fn name(&self) -> &'static str;
    async fn fetch(&self, symbol: &str, interval: Interval, period: &str) -> Result<PriceSeries, SignalError>;
  }
}

mock! {
  pub Sink {}

  #[async_trait]
  impl NotificationSink for Sink {
    async fn deliver(&self, recipient: &str, text: &str) -> Result<(), SignalError>;
  }
}

/// 횡보 후 급락하여 마지막 봉이 지지선에 닿는 시계열
fn breakdown_series() -> PriceSeries {
  let t0 = FixedOffset::east_opt(19800).unwrap().with_ymd_and_hms(2025, 4, 1, 9, 15, 0).unwrap();
  let mut bars = Vec::new();
  for i in 0..300i64 {
    let close = if i < 290 { 200.0 + (i as f64 * 0.3).sin() * 2.0 } else { 200.0 - (i - 289) as f64 * 3.0 };
    bars.push(PriceBar::new(t0 + chrono::Duration::minutes(15 * i), close, close + 0.5, close - 0.5, close));
  }
  PriceSeries::new(bars).unwrap()
}

fn provider_returning(series: PriceSeries) -> MockProvider {
  let mut provider = MockProvider::new();
  provider.expect_name().return_const("mock");
  provider
    .expect_fetch()
    .returning(move |_, _, _| Ok(series.clone()));
  provider
}

fn notification(recipient: Option<&str>, min_confidence: f64) -> NotificationConfig {
  NotificationConfig {
    recipient: recipient.map(|r| r.to_string()),
    min_confidence,
    ..NotificationConfig::default()
  }
}

fn service(provider: MockProvider, config: NotificationConfig) -> AnalysisService {
  AnalysisService::new(Arc::new(provider), TechnicalAnalyzer::default(), config)
}

#[tokio::test]
async fn test_default_period_is_derived_from_interval() {
  let mut provider = MockProvider::new();
  provider.expect_name().return_const("mock");
  provider
    .expect_fetch()
    .with(eq("RELIANCE.NS"), eq(Interval::FifteenMinutes), eq("9d"))
    .times(1)
    .returning(|_, _, _| Ok(breakdown_series()));

  let report = service(provider, notification(None, 0.5))
    .analyze("RELIANCE.NS", Interval::FifteenMinutes, None)
    .await
    .unwrap();

  assert_eq!(report.period, "9d");
  assert_eq!(report.bars.len(), 300);
  assert_eq!(report.chart.len(), 300);
}

#[tokio::test]
async fn test_explicit_period_is_passed_through() {
  let mut provider = MockProvider::new();
  provider.expect_name().return_const("mock");
  provider
    .expect_fetch()
    .with(always(), eq(Interval::OneHour), eq("30d"))
    .times(1)
    .returning(|_, _, _| Ok(breakdown_series()));

  let report = service(provider, notification(None, 0.5))
    .analyze_str("TCS.NS", "1h", Some("30d"))
    .await
    .unwrap();
  assert_eq!(report.interval, Interval::OneHour);
}

#[tokio::test]
async fn test_unsupported_interval_fails_before_fetch() {
  let mut provider = MockProvider::new();
  provider.expect_fetch().never();

  let err = service(provider, notification(None, 0.5))
    .analyze_str("TCS.NS", "2h", None)
    .await
    .unwrap_err();
  assert!(matches!(err, SignalError::UnsupportedInterval(_)));
}

#[tokio::test]
async fn test_invalid_period_fails_before_fetch() {
  let mut provider = MockProvider::new();
  provider.expect_fetch().never();

  let err = service(provider, notification(None, 0.5))
    .analyze("TCS.NS", Interval::OneDay, Some("two weeks"))
    .await
    .unwrap_err();
  assert!(matches!(err, SignalError::InvalidParameter(_)));
}

#[tokio::test]
async fn test_data_unavailable_propagates() {
  let mut provider = MockProvider::new();
  provider.expect_name().return_const("mock");
  provider
    .expect_fetch()
    .returning(|symbol, _, _| Err(SignalError::DataUnavailable(format!("No data retrieved for {}", symbol))));

  let mut sink = MockSink::new();
  sink.expect_deliver().never();

  let err = service(provider, notification(Some("9876543210"), 0.0))
    .with_notifier(Arc::new(sink))
    .analyze("DELISTED", Interval::OneDay, None)
    .await
    .unwrap_err();
  assert!(matches!(err, SignalError::DataUnavailable(_)));
}

#[tokio::test]
async fn test_alert_sent_above_threshold() {
  let mut sink = MockSink::new();
  sink
    .expect_deliver()
    .with(eq("9876543210"), function(|text: &str| text.contains("| RELIANCE.NS | Confidence:")))
    .times(1)
    .returning(|_, _| Ok(()));

  let report = service(provider_returning(breakdown_series()), notification(Some("9876543210"), 0.0))
    .with_notifier(Arc::new(sink))
    .analyze("RELIANCE.NS", Interval::FifteenMinutes, None)
    .await
    .unwrap();
  assert!(report.decision.confidence > 0.0);
}

#[tokio::test]
async fn test_delivery_failure_does_not_fail_analysis() {
  let mut sink = MockSink::new();
  sink
    .expect_deliver()
    .times(1)
    .returning(|_, _| Err(SignalError::DeliveryFailure("gateway returned 500".to_string())));

  let report = service(provider_returning(breakdown_series()), notification(Some("9876543210"), 0.0))
    .with_notifier(Arc::new(sink))
    .analyze("RELIANCE.NS", Interval::FifteenMinutes, None)
    .await;
  assert!(report.is_ok());
}

#[tokio::test]
async fn test_no_alert_at_or_below_threshold() {
  let mut sink = MockSink::new();
  sink.expect_deliver().never();

  // 신뢰도는 최대 1.05 이므로 임계값 2.0 은 절대 넘지 못함
  let report = service(provider_returning(breakdown_series()), notification(Some("9876543210"), 2.0))
    .with_notifier(Arc::new(sink))
    .analyze("RELIANCE.NS", Interval::FifteenMinutes, None)
    .await
    .unwrap();
  assert!(report.decision.confidence <= 2.0);
}

#[tokio::test]
async fn test_no_alert_without_recipient() {
  let mut sink = MockSink::new();
  sink.expect_deliver().never();

  let report = service(provider_returning(breakdown_series()), notification(None, 0.0))
    .with_notifier(Arc::new(sink))
    .analyze("RELIANCE.NS", Interval::FifteenMinutes, None)
    .await;
  assert!(report.is_ok());
}

#[tokio::test]
async fn test_quiet_market_hold_does_not_alert() {
  let t0 = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
  let flat: Vec<PriceBar> = (0..60)
    .map(|i| PriceBar::new(t0 + chrono::Duration::minutes(i), 100.0, 100.0, 100.0, 100.0))
    .collect();

  let mut sink = MockSink::new();
  sink.expect_deliver().never();

  let report = service(provider_returning(PriceSeries::new(flat).unwrap()), notification(Some("9876543210"), 0.5))
    .with_notifier(Arc::new(sink))
    .analyze("FLAT", Interval::OneMinute, None)
    .await
    .unwrap();
  assert_eq!(report.decision.signal, SignalType::Hold);
  assert_eq!(report.decision.confidence, 0.5);
}

#[tokio::test]
async fn test_watch_runs_until_shutdown() {
  let mut provider = MockProvider::new();
  provider.expect_name().return_const("mock");
  provider.expect_fetch().returning(|_, _, _| Err(SignalError::DataUnavailable("offline".to_string())));

  let runs = service(provider, notification(None, 0.5))
    .watch_until(
      "RELIANCE.NS",
      Interval::FifteenMinutes,
      Duration::from_millis(10),
      tokio::time::sleep(Duration::from_millis(55)),
    )
    .await;

  // 첫 틱은 즉시 실행되고 실패해도 루프는 계속됨
  assert!(runs >= 2);
}
