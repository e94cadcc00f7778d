//! Runtime-adjustable log severity.
//!
//! `RuntimeLogLevel` is the one piece of state mutated concurrently at
//! runtime: HTTP handlers write it, the logging filter reads it. It is an
//! explicit handle passed to whoever needs it, not an ambient global, so the
//! sharing discipline stays visible and the cell is testable on its own.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{reload, Registry};

/// Rejection for a name outside the severity enumeration.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level {0:?}, expected one of debug, info, warn, error")]
pub struct InvalidLevel(pub String);

/// Log severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// Lower-case name, as written in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// The tracing filter admitting this level and above.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }

    fn from_u8(value: u8) -> LogLevel {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    /// Upper-case name, as served by the admin API.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

type ReloadHandle = reload::Handle<LevelFilter, Registry>;

/// Shared severity threshold, safe under arbitrary concurrent callers.
///
/// The atomic cell is the source of truth for [`get`](Self::get); the
/// subscriber's reload handle is attached once by `logging::init` so that
/// [`set`](Self::set) also changes what gets emitted.
#[derive(Clone)]
pub struct RuntimeLogLevel {
    inner: Arc<Inner>,
}

struct Inner {
    current: AtomicU8,
    reload: OnceLock<ReloadHandle>,
}

impl RuntimeLogLevel {
    /// Create the cell with its mandatory initial level.
    pub fn new(initial: LogLevel) -> Self {
        Self {
            inner: Arc::new(Inner {
                current: AtomicU8::new(initial as u8),
                reload: OnceLock::new(),
            }),
        }
    }

    /// Current threshold.
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.current.load(Ordering::SeqCst))
    }

    /// Validate `name` and, if recognized, make it the current threshold.
    ///
    /// On rejection the previous level stays in effect.
    pub fn set(&self, name: &str) -> Result<LogLevel, InvalidLevel> {
        let level: LogLevel = name.parse()?;
        self.inner.current.store(level as u8, Ordering::SeqCst);
        if let Some(handle) = self.inner.reload.get() {
            // modify only fails once the subscriber itself is gone
            let _ = handle.modify(|filter| *filter = level.filter());
        }
        Ok(level)
    }

    /// Wire the cell to the installed subscriber's filter. First caller wins.
    pub(crate) fn attach(&self, handle: ReloadHandle) {
        let _ = self.inner.reload.set(handle);
    }
}

impl fmt::Debug for RuntimeLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeLogLevel")
            .field("current", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(
            "verbose".parse::<LogLevel>(),
            Err(InvalidLevel("verbose".to_string()))
        );
    }

    #[test]
    fn displays_upper_case() {
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn set_changes_current_level() {
        let level = RuntimeLogLevel::new(LogLevel::Info);
        assert_eq!(level.get(), LogLevel::Info);
        assert_eq!(level.set("warn").unwrap(), LogLevel::Warn);
        assert_eq!(level.get(), LogLevel::Warn);
    }

    #[test]
    fn rejected_set_leaves_level_unchanged() {
        let level = RuntimeLogLevel::new(LogLevel::Info);
        assert!(level.set("verbose").is_err());
        assert_eq!(level.get(), LogLevel::Info);
    }

    #[test]
    fn concurrent_setters_never_tear() {
        let level = RuntimeLogLevel::new(LogLevel::Info);
        let mut handles = Vec::new();
        for i in 0..8 {
            let level = level.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let name = if i % 2 == 0 { "debug" } else { "error" };
                    level.set(name).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(matches!(level.get(), LogLevel::Debug | LogLevel::Error));
    }
}
