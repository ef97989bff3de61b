/**
* filename : routes
* author : HAMA
* date: 2025. 5. 14.
* description: 신호 API 라우트
**/

use warp::Filter;

use crate::api::handlers;
use crate::service::AnalysisService;

/// 신호 API 라우트 생성
///
/// `default_interval` applies when the query has no `interval`.
pub fn create_routes(
    service: AnalysisService,
    default_interval: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // 헬스체크 라우트
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // 상태 필터
    let service_filter = warp::any().map(move || service.clone());
    let interval_filter = warp::any().map(move || default_interval.clone());

    // 신호 조회 라우트
    let signal = warp::path("signal")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<handlers::SignalQuery>())
        .and(interval_filter)
        .and(service_filter)
        .and_then(handlers::get_signal);

    health.or(signal).with(warp::log("xsignal::api"))
}
