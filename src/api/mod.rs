//! 신호 조회 HTTP API (warp)

pub mod handlers;
pub mod routes;

pub use routes::create_routes;
