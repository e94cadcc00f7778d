//! Process entry point: wire config, logging, servers, and supervision.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use chat_service::admin::{AdminError, DebugServer, DebugServerOptions};
use chat_service::buildinfo::BuildInfo;
use chat_service::config::{self, ConfigError};
use chat_service::lifecycle::{signals, supervisor, SupervisedTask, TaskError};
use chat_service::observability::{self, InvalidLevel, LoggingError, LogLevel, RuntimeLogLevel};

#[derive(Debug, Parser)]
#[command(name = "chat-service", version, about = "Chat service")]
struct Cli {
    /// Path to config file
    #[arg(long, default_value = "configs/config.toml")]
    config: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("parse and validate config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("config log level: {0}")]
    LogLevel(#[from] InvalidLevel),

    #[error("logger init: {0}")]
    Logging(#[from] LoggingError),

    #[error("init debug server: {0}")]
    DebugServer(#[from] AdminError),

    #[error("wait app stop: {0}")]
    Run(#[from] TaskError),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("run app: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config).map_err(|source| AppError::Config {
        path: cli.config.clone(),
        source,
    })?;

    let initial: LogLevel = cfg.log.level.parse()?;
    let level = RuntimeLogLevel::new(initial);
    observability::init_logging(cfg.is_production(), &level)?;

    let debug_server = DebugServer::new(DebugServerOptions {
        addr: cfg.servers.debug.addr.clone(),
        level: level.clone(),
        build: BuildInfo::collect(),
    })?;

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match signals::shutdown_signal().await {
                Ok(()) => tracing::info!("termination signal received"),
                Err(err) => tracing::error!(error = %err, "signal listener failed"),
            }
            shutdown.cancel();
        }
    });

    // Servers; services join this list as they appear.
    let tasks = vec![SupervisedTask::new("server-debug", move |cancel| async move {
        debug_server.run(cancel).await.map_err(TaskError::failed)
    })];

    supervisor::run(shutdown, tasks).await?;
    Ok(())
}
