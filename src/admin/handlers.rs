//! Admin endpoint handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub users: usize,
    pub teams: usize,
    pub tasks: usize,
}

#[derive(Serialize)]
pub struct RateLimitStatus {
    pub enabled: bool,
    pub window_ms: u64,
    pub max_requests: u32,
    pub tracked_ips: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let (users, teams, tasks) = state.store.summary();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        users,
        teams,
        tasks,
    })
}

pub async fn get_rate_limit(State(state): State<AppState>) -> Json<RateLimitStatus> {
    let config = state.limiter.config();
    Json(RateLimitStatus {
        enabled: config.enabled,
        window_ms: config.window_ms,
        max_requests: config.max_requests,
        tracked_ips: state.limiter.tracked_ips(),
    })
}
