//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals to a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A second signal skips graceful shutdown and exits immediately

use crate::lifecycle::shutdown::Shutdown;

/// Wait for an interrupt and trigger shutdown. A second interrupt exits the
/// process without waiting for in-flight work.
pub async fn listen(shutdown: Shutdown) {
    wait_for_interrupt().await;
    tracing::info!("interrupt received, shutting down");
    shutdown.trigger();

    wait_for_interrupt().await;
    tracing::warn!("second interrupt, exiting immediately");
    std::process::exit(130);
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for ctrl-c only");
            let _ = ctrl_c.await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    let _ = tokio::signal::ctrl_c().await;
}
