//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check enumerated fields against their allowed values
//! - Check the debug server address is a well-formed host:port
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before any component starts; an invalid config is startup-fatal

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{Config, ENVIRONMENTS};
use crate::observability::LogLevel;

/// A single violated constraint, named by its config key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("global.env: {0:?} is not one of dev, stage, prod")]
    UnknownEnv(String),

    #[error("log.level: {0:?} is not one of debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("servers.debug.addr: {0:?} is not a host:port")]
    BadDebugAddr(String),
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !ENVIRONMENTS.contains(&config.global.env.as_str()) {
        errors.push(ValidationError::UnknownEnv(config.global.env.clone()));
    }

    if config.log.level.parse::<LogLevel>().is_err() {
        errors.push(ValidationError::UnknownLogLevel(config.log.level.clone()));
    }

    if !is_host_port(&config.servers.debug.addr) {
        errors.push(ValidationError::BadDebugAddr(
            config.servers.debug.addr.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True when `addr` is a socket address literal or a `hostname:port` pair.
///
/// Name resolution happens at bind time; this only checks the shape.
pub(crate) fn is_host_port(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DebugServerConfig, GlobalConfig, LogConfig, ServersConfig};

    fn config(env: &str, level: &str, addr: &str) -> Config {
        Config {
            global: GlobalConfig {
                env: env.to_string(),
            },
            log: LogConfig {
                level: level.to_string(),
            },
            servers: ServersConfig {
                debug: DebugServerConfig {
                    addr: addr.to_string(),
                },
            },
        }
    }

    #[test]
    fn accepts_valid_config() {
        for env in ENVIRONMENTS {
            assert!(validate_config(&config(env, "info", "127.0.0.1:8079")).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_env() {
        let errors = validate_config(&config("production", "info", "127.0.0.1:8079")).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownEnv("production".to_string())]
        );
    }

    #[test]
    fn rejects_unknown_log_level() {
        let errors = validate_config(&config("dev", "verbose", "127.0.0.1:8079")).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownLogLevel("verbose".to_string())]
        );
    }

    #[test]
    fn rejects_bad_addr() {
        let errors = validate_config(&config("dev", "info", "not-an-addr")).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::BadDebugAddr("not-an-addr".to_string())]
        );
    }

    #[test]
    fn reports_all_violations() {
        let errors = validate_config(&config("", "", "")).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn host_port_shapes() {
        assert!(is_host_port("127.0.0.1:8080"));
        assert!(is_host_port("[::1]:8080"));
        assert!(is_host_port("localhost:8080"));
        assert!(!is_host_port("localhost"));
        assert!(!is_host_port(":8080"));
        assert!(!is_host_port("localhost:http"));
        assert!(!is_host_port("localhost:99999"));
        assert!(!is_host_port("::1:8080"));
    }
}
