//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     snapshot file (JSON, optional)
//!         → memory.rs (load into DashMaps)
//!
//! Request time:
//!     api handlers → MemoryStore (concurrent reads/writes)
//!
//! Shutdown:
//!     MemoryStore → snapshot file (JSON)
//! ```
//!
//! # Design Decisions
//! - The store is the storage collaborator behind the API handlers; every
//!   data operation returns `Result` so callers map failures to a single
//!   internal-error response instead of partially succeeding
//! - Sessions and rate-limit counters are never persisted; both are
//!   best-effort state that a restart may drop

pub mod memory;

use thiserror::Error;

/// Errors surfaced by the storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Snapshot file could not be read or written.
    #[error("snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file did not parse as a valid snapshot.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub use memory::MemoryStore;
