//! Helpdesk worker - multi-tenant helpdesk API gateway
//!
//! Main entry point for the worker process.

use std::sync::Arc;

use anyhow::{Context, Result};
use helpdesk_worker::utils::logging;
use helpdesk_worker::{lifecycle, AppContext};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading configuration so HELPDESK_CONFIG can live there
    let dotenv = dotenvy::dotenv();

    let config = helpdesk_infra::config::load().context("failed to load configuration")?;
    logging::init(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "no .env file loaded"),
    }

    let ctx = match AppContext::new(config) {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => {
            error!(error = %err, "failed to build application context");
            return Err(err.into());
        }
    };

    let listener = TcpListener::bind(&ctx.config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", ctx.config.server.bind))?;

    let controls =
        lifecycle::spawn_operator_controls(Arc::clone(&ctx.registry), ctx.shutdown.clone())?;

    lifecycle::serve(Arc::clone(&ctx), listener, async {
        if let Err(err) = lifecycle::wait_for_shutdown().await {
            error!(error = %err, "signal handling failed, shutting down");
        }
    })
    .await?;

    controls.await.context("operator control task panicked")?;
    info!("helpdesk worker stopped");
    Ok(())
}
