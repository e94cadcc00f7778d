//! Debug server construction and serve loop.
//!
//! # Responsibilities
//! - Validate the bind address before any socket is opened
//! - Register the fixed admin route table
//! - Serve connections with a header-read timeout
//! - Graceful shutdown: stop accepting, drain in-flight, force-close on budget
//!
//! # Design Decisions
//! - The serve loop drives hyper directly instead of `axum::serve` so the
//!   header-read timeout and the bounded drain can be expressed
//! - Transient accept errors are logged, never fatal

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::admin::handlers::{self, AdminState};
use crate::admin::index::AdminIndex;
use crate::admin::profiling;
use crate::buildinfo::BuildInfo;
use crate::config::validation::is_host_port;
use crate::observability::RuntimeLogLevel;

/// Bounds slow clients that open a connection but trickle headers.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Budget for draining in-flight requests after cancellation.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Error type for the debug server.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid debug server addr {addr:?}")]
    InvalidAddr { addr: String },

    #[error("listen on {addr}: {source}")]
    Listen {
        addr: String,
        source: std::io::Error,
    },

    #[error("graceful shutdown exceeded {timeout:?}")]
    ShutdownTimeout { timeout: Duration },
}

/// Construction options for [`DebugServer`].
pub struct DebugServerOptions {
    /// Bind address (`host:port`).
    pub addr: String,
    /// Shared log-level cell mutated by the admin API.
    pub level: RuntimeLogLevel,
    /// Build metadata served by `/version`.
    pub build: BuildInfo,
}

/// The admin/debug HTTP server.
#[derive(Debug)]
pub struct DebugServer {
    addr: String,
    router: Router,
}

impl DebugServer {
    /// Validate options and build the route table. No socket is opened here.
    pub fn new(opts: DebugServerOptions) -> Result<Self, AdminError> {
        if !is_host_port(&opts.addr) {
            return Err(AdminError::InvalidAddr { addr: opts.addr });
        }

        let mut index = AdminIndex::new();
        index.add_entry("/version", "Build information");
        index.add_entry("/log/level", "Current log level (PUT to change)");
        index.add_entry("/debug/pprof/", "Profiling index");
        index.add_entry("/debug/pprof/profile?seconds=30", "Half-minute CPU profile");
        index.add_entry("/debug/pprof/tasks", "Runtime task snapshot");

        let state = AdminState {
            level: opts.level,
            build: opts.build,
            index: Arc::new(index),
        };

        let router = Router::new()
            .route("/", get(handlers::index_page))
            .route("/version", get(handlers::version))
            .route(
                "/log/level",
                get(handlers::get_log_level).put(handlers::put_log_level),
            )
            .route("/debug/pprof", get(profiling::profiling_index))
            .route("/debug/pprof/", get(profiling::profiling_index))
            .route("/debug/pprof/profile", get(profiling::cpu_profile))
            .route("/debug/pprof/tasks", get(profiling::tasks_snapshot))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Ok(Self {
            addr: opts.addr,
            router,
        })
    }

    /// Bind address this server was configured with.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Listen and serve until `cancel` fires, then drain within budget.
    ///
    /// Returns `Ok(())` after a clean drain, `AdminError::Listen` if the
    /// address cannot be bound, `AdminError::ShutdownTimeout` if in-flight
    /// requests outlive the budget.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), AdminError> {
        let listener =
            TcpListener::bind(self.addr.as_str())
                .await
                .map_err(|source| AdminError::Listen {
                    addr: self.addr.clone(),
                    source,
                })?;
        tracing::info!(addr = %self.addr, "listen and serve");

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(HEADER_READ_TIMEOUT);
        let graceful = GracefulShutdown::new();
        let service = TowerToHyperService::new(self.router);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let io = TokioIo::new(stream);
                            let conn = builder
                                .serve_connection_with_upgrades(io, service.clone());
                            let conn = graceful.watch(conn.into_owned());
                            tokio::spawn(async move {
                                if let Err(err) = conn.await {
                                    tracing::debug!(peer = %peer, error = %err, "connection error");
                                }
                            });
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "accept failed");
                        }
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }

        // Stop accepting before draining.
        drop(listener);
        tracing::info!("draining in-flight connections");

        tokio::select! {
            _ = graceful.shutdown() => {
                tracing::info!("debug server stopped");
                Ok(())
            }
            _ = tokio::time::sleep(SHUTDOWN_TIMEOUT) => {
                Err(AdminError::ShutdownTimeout { timeout: SHUTDOWN_TIMEOUT })
            }
        }
    }
}
