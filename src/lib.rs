//! Chat service bootstrap library.
//!
//! Startup and lifecycle layer of the service: validated configuration,
//! structured logging with a runtime-adjustable level, an admin/debug HTTP
//! server, and fail-fast supervision of long-running components.

pub mod admin;
pub mod buildinfo;
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use admin::{AdminError, DebugServer, DebugServerOptions};
pub use buildinfo::BuildInfo;
pub use config::Config;
pub use lifecycle::{SupervisedTask, TaskError};
pub use observability::{LogLevel, RuntimeLogLevel};
