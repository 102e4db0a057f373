use std::time::Duration;

use anyhow::anyhow;
use helpdesk_domain::{HelpdeskError, LoggingConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG`; emits JSON lines when `config.json` is set.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Log the outcome of one inbound call with structured fields.
///
/// `tenant` and `action` are caller-supplied identifiers and never carry
/// credentials.
#[inline]
pub fn log_call_outcome(
    tenant: &str,
    action: &str,
    elapsed: Duration,
    outcome: Result<usize, &HelpdeskError>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    match outcome {
        Ok(items) => info!(tenant, action, duration_ms, items, "call_succeeded"),
        Err(err) => info!(tenant, action, duration_ms, kind = err.kind(), "call_failed"),
    }
}
