//! API route handlers.
//!
//! # Data Flow
//! ```text
//! Router:
//!     /api/auth/*  (public)    ──┐
//!     /api/tasks*  (protected) ──┼─ rate_limit_middleware (all /api routes)
//!     /api/teams   (protected) ──┤      protected routes additionally pass
//!     /api/user/me (protected) ──┘      session_middleware → CurrentUser
//! ```

pub mod auth;
pub mod counts;
pub mod tasks;
pub mod teams;
pub mod users;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::session::session_middleware;
use crate::http::server::AppState;
use crate::security::rate_limit::rate_limit_middleware;

/// Assemble the API router. All routes sit behind the rate limiter;
/// everything except the auth endpoints also requires a session.
pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/tasks",
            get(tasks::list_tasks)
                .post(tasks::create_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/tasks/count", get(counts::get_task_counts))
        .route(
            "/api/teams",
            get(teams::list_teams)
                .post(teams::create_team)
                .delete(teams::delete_team),
        )
        .route("/api/user/me", get(users::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    protected
        .merge(public)
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}
