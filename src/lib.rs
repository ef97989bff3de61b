//! 기술적 분석 신호 라이브러리
//!
//! 가격 이력에서 지표를 계산하고 BUY / SELL / HOLD 신호를 생성합니다.
//! 가격 조회, 알림 전송, HTTP API는 엔진을 감싸는 외곽 계층입니다.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod notification;
pub mod service;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::config::{AnalyzerConfig, Config};
pub use crate::engine::TechnicalAnalyzer;
pub use crate::error::SignalError;
pub use crate::indicators::{IndicatorSet, IndicatorSnapshot};
pub use crate::market_data::PriceHistoryProvider;
pub use crate::models::{AnalysisReport, Interval, PriceBar, PriceSeries, SignalDecision};
pub use crate::notification::NotificationSink;
pub use crate::service::AnalysisService;
pub use crate::signals::{ScoringRules, SignalType};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SignalError>;
