//! Task subsystem.
//!
//! # Data Flow
//! ```text
//! api handlers
//!     → types.rs (payload validation, completed/completed_at coupling)
//!     → storage (persist)
//!
//! GET /api/tasks/count
//!     → counts.rs (aggregate per-user badge counts)
//! ```

pub mod counts;
pub mod types;

pub use counts::{compute_counts, local_day_window, TaskCounts};
pub use types::{CreateTaskRequest, Task, UpdateTaskRequest};
