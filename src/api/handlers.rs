/**
* filename : handlers
* author : HAMA
* date: 2025. 5. 14.
* description: 신호 API 핸들러
**/

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{json, with_status, Reply};

use crate::error::SignalError;
use crate::service::AnalysisService;

/// `GET /signal/{symbol}` 쿼리
#[derive(Debug, Deserialize)]
pub struct SignalQuery {
    pub interval: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// 헬스체크 핸들러
pub async fn health_handler() -> Result<impl Reply, warp::Rejection> {
    let body = Health {
        status: "ok",
        version: crate::VERSION,
    };
    Ok(with_status(json(&body), StatusCode::OK))
}

/// 신호 조회 핸들러
pub async fn get_signal(
    symbol: String,
    query: SignalQuery,
    default_interval: String,
    service: AnalysisService,
) -> Result<impl Reply, warp::Rejection> {
    let interval = query.interval.unwrap_or(default_interval);

    match service
        .analyze_str(&symbol, &interval, query.period.as_deref())
        .await
    {
        Ok(report) => Ok(with_status(json(&report), StatusCode::OK)),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                log::error!("신호 조회 실패 {}: {}", symbol, e);
            } else {
                log::warn!("신호 조회 거부 {}: {}", symbol, e);
            }
            let body = ErrorBody { error: e.to_string() };
            Ok(with_status(json(&body), status))
        }
    }
}

/// Maps an analysis error to the response status.
pub fn status_for(error: &SignalError) -> StatusCode {
    match error {
        SignalError::UnsupportedInterval(_) | SignalError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        SignalError::DataUnavailable(_) => StatusCode::NOT_FOUND,
        SignalError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SignalError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SignalError::HttpError(_)
        | SignalError::IoError(_)
        | SignalError::SerializationError(_)
        | SignalError::ParseError(_)
        | SignalError::InvalidSeries(_)
        | SignalError::DeliveryFailure(_) => StatusCode::BAD_GATEWAY,
    }
}
