//! Configuration schema definitions.
//!
//! Mirrors the TOML layout of the config file. Fields stay plain strings
//! here; semantic checks live in `validation.rs`, so every violation can be
//! reported instead of failing on the first bad field.

use serde::Deserialize;

/// Environments the service can run in.
pub const ENVIRONMENTS: [&str; 3] = ["dev", "stage", "prod"];

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Process-wide settings.
    pub global: GlobalConfig,

    /// Logging settings.
    pub log: LogConfig,

    /// Per-server settings.
    pub servers: ServersConfig,
}

impl Config {
    /// True for environments that log JSON instead of the dev console format.
    pub fn is_production(&self) -> bool {
        matches!(self.global.env.as_str(), "prod" | "stage")
    }
}

/// Settings that apply to the whole process.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConfig {
    /// Deployment environment: one of `dev`, `stage`, `prod`.
    pub env: String,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Initial severity threshold: one of `debug`, `info`, `warn`, `error`.
    pub level: String,
}

/// Per-server settings, one section per server the binary hosts.
#[derive(Debug, Clone, Deserialize)]
pub struct ServersConfig {
    /// Admin/debug HTTP server.
    pub debug: DebugServerConfig,
}

/// Admin/debug server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugServerConfig {
    /// Bind address (e.g. "127.0.0.1:8079").
    pub addr: String,
}
