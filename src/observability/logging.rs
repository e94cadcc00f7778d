//! Structured logging setup.
//!
//! # Responsibilities
//! - Install the global tracing subscriber once at startup
//! - Wire the level filter to a [`RuntimeLogLevel`] so the admin API can
//!   change it while the process runs
//!
//! # Design Decisions
//! - JSON format for prod/stage, human-readable ANSI format for dev
//! - Init failure is an error, not a panic: the entry point decides

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, reload};

use crate::observability::RuntimeLogLevel;

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("install global subscriber: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Install the process-wide logging sink.
///
/// The filter starts at `level.get()` and follows every successful
/// `level.set(..)` afterward.
pub fn init(production: bool, level: &RuntimeLogLevel) -> Result<(), LoggingError> {
    let (filter, handle) = reload::Layer::new(level.get().filter());
    level.attach(handle);

    let registry = tracing_subscriber::registry().with(filter);
    if production {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer().with_ansi(true)).try_init()?;
    }
    Ok(())
}
