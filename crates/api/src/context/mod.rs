//! Application context - dependency injection container

use std::sync::Arc;

use helpdesk_core::{HelpdeskService, RequestHandler};
use helpdesk_domain::{HelpdeskConfig, Result};
use helpdesk_infra::TenantRegistry;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Application context - holds every long-lived component of the worker
pub struct AppContext {
    pub config: HelpdeskConfig,
    pub registry: Arc<TenantRegistry>,
    pub handler: Arc<dyn RequestHandler>,

    /// Cancelled once shutdown starts; the inbound adapter stops accepting
    /// calls when it fires.
    pub shutdown: CancellationToken,
}

impl AppContext {
    /// Build the registry for every configured tenant and the handler on top
    /// of it.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns `HelpdeskError::Config` if any tenant cannot be bound.
    pub fn new(config: HelpdeskConfig) -> Result<Self> {
        let registry = Arc::new(TenantRegistry::from_config(&config)?);
        let context = Self::from_parts(config, registry);
        info!(tenants = context.registry.len(), "application context ready");
        Ok(context)
    }

    /// Assemble a context around an existing registry.
    pub fn from_parts(config: HelpdeskConfig, registry: Arc<TenantRegistry>) -> Self {
        let handler: Arc<dyn RequestHandler> = Arc::new(HelpdeskService::new(registry.clone()));
        Self { config, registry, handler, shutdown: CancellationToken::new() }
    }

    /// Tenant named by an inbound service name, if it carries the
    /// configured prefix.
    pub fn tenant_for_service<'a>(&self, service: &'a str) -> Option<&'a str> {
        service
            .strip_prefix(self.config.server.service_prefix.as_str())?
            .strip_prefix(':')
            .filter(|tenant| !tenant.is_empty())
    }
}
