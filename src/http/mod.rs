//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security (origin gate, rate limit)
//!     → auth (session → CurrentUser)
//!     → api handlers
//!     → response.rs (typed outcomes → status + JSON body)
//! ```

pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
