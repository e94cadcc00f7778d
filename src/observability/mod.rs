//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config log.level ──► RuntimeLogLevel (atomic cell)
//!                            │    ▲
//!        logging::init ──────┘    │ set()/get()
//!        (reload handle)          │
//!                            admin API (/log/level)
//! ```
//!
//! # Design Decisions
//! - One shared, injectable level cell instead of ambient global state
//! - tracing/tracing-subscriber is the only logging stack
//! - Level reloads apply to the live subscriber, not just the cell

pub mod level;
pub mod logging;

pub use level::{InvalidLevel, LogLevel, RuntimeLogLevel};
pub use logging::{init as init_logging, LoggingError};
