//! Tenant registry
//!
//! Built once at startup from configuration and never mutated afterwards.
//! Each tenant gets a signing, paginating client and its own scheduler.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use helpdesk_core::{TenantDirectory, TenantLane, TenantScheduler};
use helpdesk_domain::{HelpdeskConfig, HelpdeskError, Result};
use serde::Serialize;
use tracing::info;

use crate::api::{HelpdeskClient, PagingClient, PagingConfig};

/// Point-in-time view of one tenant's scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantStatus {
    pub name: String,
    pub paused: bool,
    pub queued: usize,
}

/// Immutable tenant name → lane mapping.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    tenants: BTreeMap<String, TenantLane>,
}

impl TenantRegistry {
    /// Build every tenant's client and scheduler.
    ///
    /// Must run inside a tokio runtime since each scheduler spawns its worker.
    ///
    /// # Errors
    /// `HelpdeskError::Config` naming the tenant whose client cannot be built.
    pub fn from_config(config: &HelpdeskConfig) -> Result<Self> {
        let paging = PagingConfig::from(&config.http);
        let mut tenants = BTreeMap::new();

        for (name, tenant) in &config.helpdesk {
            let client = HelpdeskClient::new(tenant, &config.http)
                .map_err(|e| HelpdeskError::Config(format!("tenant '{name}': {e}")))?;
            info!(
                tenant = %name,
                revision = %tenant.revision,
                prefix = %client.prefix(),
                "tenant client configured"
            );

            let source = Arc::new(PagingClient::new(Arc::new(client), paging));
            let scheduler = Arc::new(TenantScheduler::new(name.as_str()));
            tenants.insert(name.clone(), TenantLane::new(source, scheduler));
        }

        info!(tenants = tenants.len(), "tenant registry built");
        Ok(Self { tenants })
    }

    /// Assemble a registry from prebuilt lanes.
    pub fn from_lanes(lanes: impl IntoIterator<Item = (String, TenantLane)>) -> Self {
        Self { tenants: lanes.into_iter().collect() }
    }

    pub fn get(&self, name: &str) -> Option<&TenantLane> {
        self.tenants.get(name)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    /// Reject new work for every tenant.
    pub fn pause_all(&self) {
        self.tenants.values().for_each(|lane| lane.scheduler.pause());
    }

    /// Accept new work again for every tenant.
    pub fn resume_all(&self) {
        self.tenants.values().for_each(|lane| lane.scheduler.resume());
    }

    /// Wait until every tenant has settled the work it had accepted.
    pub async fn drain_all(&self) {
        join_all(self.tenants.values().map(|lane| lane.scheduler.drain())).await;
    }

    pub fn snapshot(&self) -> Vec<TenantStatus> {
        self.tenants
            .iter()
            .map(|(name, lane)| TenantStatus {
                name: name.clone(),
                paused: lane.scheduler.is_paused(),
                queued: lane.scheduler.queued(),
            })
            .collect()
    }
}

impl TenantDirectory for TenantRegistry {
    fn lane(&self, tenant: &str) -> Option<TenantLane> {
        self.tenants.get(tenant).cloned()
    }

    fn tenants(&self) -> Vec<String> {
        self.tenants.keys().cloned().collect()
    }
}
