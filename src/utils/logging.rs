//! 로깅 유틸리티
//!
//! 로그 초기화 및 분석 이벤트 로그 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::SignalError;
use crate::models::SignalDecision;

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
///
/// `RUST_LOG` wins over the configured level when both are present.
pub fn init(configured_level: &str) -> Result<(), SignalError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| configured_level.to_string());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| SignalError::ConfigError(format!("Logger already initialised: {}", e)))?;

    log::info!("Logging initialised: level = {}", log_level);

    Ok(())
}

/// 분석 시작 로그
pub fn log_analysis_start(symbol: &str, interval: &str, period: &str) {
    log::info!("Analysis start: {} - interval: {} - period: {}", symbol, interval, period);
}

/// 분석 결과 로그
pub fn log_decision(symbol: &str, decision: &SignalDecision) {
    log::info!(
        "Signal: {} - {:?} - confidence: {} - price: {} - hold: {}m",
        symbol, decision.signal, decision.confidence, decision.current_price, decision.hold_minutes
    );
}

/// 오류 로그
pub fn log_error(context: &str, error: &SignalError) {
    log::error!("Error - {}: {}", context, error);
}
