//! Operator endpoints, behind a bearer API key.

pub mod auth;
pub mod handlers;

use axum::middleware;
use axum::routing::get;
use axum::Router;

use self::auth::admin_auth_middleware;
use crate::http::server::AppState;

pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(handlers::get_status))
        .route("/admin/rate-limit", get(handlers::get_rate_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ))
        .with_state(state)
}
