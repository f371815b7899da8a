//! Session handling.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → session.rs (Authorization: Bearer <token> → Session lookup)
//!     → CurrentUser attached to request extensions
//!     → Pass to api handlers
//! ```
//!
//! # Design Decisions
//! - Sessions are opaque bearer tokens; how a token is minted by a real
//!   identity provider is out of scope, the register/login handlers exist so
//!   the protected surface is exercisable
//! - Expired sessions are removed lazily on lookup
//! - Fail closed: missing, unknown, or expired token → 401

pub mod session;
pub mod types;

pub use session::{session_middleware, SESSION_TTL_DAYS};
pub use types::{CurrentUser, Session, User};
