//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging → Build servers → supervisor::run
//!
//! Shutdown:
//!     SIGINT/SIGTERM → root CancellationToken → task scopes → drain → exit
//!
//! Failure:
//!     Any task fails → scope canceled → siblings drain → error to main
//! ```
//!
//! # Design Decisions
//! - Cancellation is a one-shot, idempotent broadcast (CancellationToken)
//! - Tasks are never restarted; a failure ends the process
//! - Expected cancellation is success, not an error

pub mod signals;
pub mod supervisor;
pub mod task;

pub use task::{BoxError, SupervisedTask, TaskError};
