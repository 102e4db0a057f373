//! Process lifecycle: operator pause/resume and graceful shutdown
//!
//! `SIGTSTP` pauses and `SIGCONT` resumes every tenant scheduler.
//! `SIGINT`/`SIGTERM` stop the inbound adapter, pause every scheduler and
//! wait for each one to settle the work it had already accepted.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use helpdesk_infra::TenantRegistry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::transport::router;
use crate::AppContext;

/// Operator requests delivered through job-control signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSignal {
    Pause,
    Resume,
}

/// Apply an operator request to every tenant.
pub fn apply_operator_signal(registry: &TenantRegistry, signal: OperatorSignal) {
    match signal {
        OperatorSignal::Pause => {
            warn!(tenants = registry.len(), "pausing all tenants");
            registry.pause_all();
        }
        OperatorSignal::Resume => {
            warn!(tenants = registry.len(), "resuming all tenants");
            registry.resume_all();
        }
    }
}

/// Listen for `SIGTSTP`/`SIGCONT` until `token` is cancelled.
///
/// # Errors
/// Fails if the signal handlers cannot be installed.
#[cfg(unix)]
pub fn spawn_operator_controls(
    registry: Arc<TenantRegistry>,
    token: CancellationToken,
) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut stop =
        signal(SignalKind::from_raw(libc::SIGTSTP)).context("failed to install SIGTSTP handler")?;
    let mut cont =
        signal(SignalKind::from_raw(libc::SIGCONT)).context("failed to install SIGCONT handler")?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                Some(()) = stop.recv() => apply_operator_signal(&registry, OperatorSignal::Pause),
                Some(()) = cont.recv() => apply_operator_signal(&registry, OperatorSignal::Resume),
                else => break,
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_operator_controls(
    _registry: Arc<TenantRegistry>,
    token: CancellationToken,
) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move { token.cancelled().await }))
}

/// Wait for termination signals (Ctrl+C, SIGTERM).
///
/// # Errors
/// Returns an error if signal handling fails.
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to listen for Ctrl+C")?;
            info!("Received SIGINT");
        }
        result = wait_sigterm() => {
            result?;
            info!("Received SIGTERM");
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn wait_sigterm() -> Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> Result<()> {
    std::future::pending::<Result<()>>().await
}

/// Stop accepting calls, pause every tenant and wait for accepted work.
pub async fn shutdown(ctx: &AppContext) {
    info!("shutdown started");
    ctx.shutdown.cancel();
    ctx.registry.pause_all();
    ctx.registry.drain_all().await;
    info!("all tenants drained");
}

/// Serve the inbound adapter on `listener` until `signal` resolves, then
/// shut down gracefully.
///
/// # Errors
/// Returns an error if the server fails or its task panics.
pub async fn serve<S>(ctx: Arc<AppContext>, listener: TcpListener, signal: S) -> Result<()>
where
    S: Future<Output = ()> + Send,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    let app = router(Arc::clone(&ctx));
    let stopped = ctx.shutdown.clone();

    let server = tokio::spawn(async move {
        axum::serve(listener, app).with_graceful_shutdown(stopped.cancelled_owned()).await
    });
    info!(%addr, "inbound adapter listening");

    signal.await;
    shutdown(&ctx).await;

    match server.await {
        Ok(result) => result.context("inbound adapter failed"),
        Err(err) => {
            error!(error = %err, "inbound adapter task panicked");
            Err(err).context("inbound adapter task panicked")
        }
    }
}
