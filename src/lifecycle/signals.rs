//! OS signal handling.
//!
//! Translates the two standard termination signals into the shutdown
//! cancellation. Repeated signals have no further effect: the token is
//! already canceled.

/// Wait for a termination signal (SIGINT or SIGTERM).
///
/// Returns `Ok(())` when a signal is received, or `Err` if signal
/// registration fails.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

/// Wait for a termination signal (Ctrl-C).
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
