//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all violations collected)
//!     → Config (validated, immutable)
//!     → read-only from the entry point onward
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - Required fields have no defaults: a missing key is a parse error
//! - Validation is explicit per-field code, not derive-macro annotations

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::Config;
pub use validation::ValidationError;
