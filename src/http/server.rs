//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, concurrency cap)
//! - Bind the server to a listener and run with graceful shutdown
//! - Persist the storage snapshot on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::api;
use crate::config::AppConfig;
use crate::observability::metrics;
use crate::security::origin::OriginPolicy;
use crate::security::rate_limit::{MemoryRateLimitStore, RateLimiter};
use crate::storage::{MemoryStore, StorageError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<MemoryStore>,
    pub limiter: Arc<RateLimiter>,
}

/// HTTP server for the Calira backend.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only when the configured storage snapshot exists but cannot be
    /// loaded.
    pub fn new(config: AppConfig) -> Result<Self, StorageError> {
        let store = match &config.storage.snapshot_path {
            Some(path) => MemoryStore::with_snapshot(path.as_ref())?,
            None => MemoryStore::new(),
        };

        let limiter = RateLimiter::new(
            config.security.rate_limit.clone(),
            OriginPolicy::from_config(&config.security),
            Arc::new(MemoryRateLimitStore::new()),
        );

        let state = AppState {
            config: Arc::new(config),
            store: Arc::new(store),
            limiter: Arc::new(limiter),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    /// The shared application state, exposed for tests and shutdown hooks.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let mut router = api::api_router(state.clone());
        if config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        router
            .route("/health", get(health))
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // Best-effort snapshot on the way out; sessions and rate-limit
        // counters are deliberately not persisted.
        if let Err(e) = self.state.store.save() {
            tracing::error!(error = %e, "Failed to write storage snapshot");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Record request count and latency per matched route.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
