//! Build metadata surfaced by the admin API.

use serde::Serialize;

/// Compile-time build metadata, served verbatim by `GET /version`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub commit: &'static str,
    pub profile: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
}

impl BuildInfo {
    /// Collect metadata baked in at compile time.
    ///
    /// `GIT_COMMIT` is injected by the build environment when available.
    pub fn collect() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT").unwrap_or("unknown"),
            profile: if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}
