//! # Cross-platform OS signal handling.
//!
//! [`wait_for_signal`] completes when the process receives a termination
//! signal. Signal delivery itself does no teardown — the supervisor's signal
//! watcher turns completion into a shutdown-requested flag that the
//! monitoring loop observes on its next wake, keeping collection mutation
//! out of the signal context.
//!
//! Unix: `SIGINT` (Ctrl-C), `SIGTERM` (systemd/Kubernetes default kill),
//! `SIGQUIT`. Elsewhere: Ctrl-C via [`tokio::signal::ctrl_c`].

/// Waits for a termination signal.
///
/// Each call registers independent listeners. Returns `Ok(())` when any
/// signal arrives, or `Err` if listener registration fails.
#[cfg(unix)]
pub(crate) async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
        _ = sigquit.recv() => {}
    }
    Ok(())
}

/// Waits for a termination signal (Ctrl-C only off unix).
#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
