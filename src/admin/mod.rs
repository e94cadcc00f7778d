//! Admin/debug HTTP surface.
//!
//! # Data Flow
//! ```text
//! GET /                → index.rs (registered paths + level widget)
//! GET /version         → handlers.rs (BuildInfo as JSON)
//! GET/PUT /log/level   → handlers.rs ⇄ RuntimeLogLevel
//! GET /debug/pprof/*   → profiling.rs (CPU flamegraph, task snapshot)
//! ```

pub mod handlers;
pub mod index;
pub mod profiling;
pub mod server;

pub use index::AdminIndex;
pub use server::{AdminError, DebugServer, DebugServerOptions};
