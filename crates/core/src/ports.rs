//! Port interfaces between the request pipeline and infrastructure

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_domain::{ListEndpoint, Result, SearchParams};
use serde_json::Value;

use crate::scheduler::TenantScheduler;

/// Fetches complete listings from one tenant's upstream API.
///
/// Implementations sign requests with a per-tenant nonce and must only be
/// invoked from inside that tenant's [`TenantScheduler`].
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Walk every page of `endpoint` and return the items in server order.
    async fn fetch_all(&self, endpoint: ListEndpoint, params: SearchParams) -> Result<Vec<Value>>;
}

/// Resolves tenant names to their execution lane.
pub trait TenantDirectory: Send + Sync {
    /// Exact-match lookup.
    fn lane(&self, tenant: &str) -> Option<TenantLane>;

    /// Names of every configured tenant.
    fn tenants(&self) -> Vec<String>;
}

/// A tenant's list source paired with the scheduler that serializes it.
#[derive(Clone)]
pub struct TenantLane {
    pub source: Arc<dyn ListSource>,
    pub scheduler: Arc<TenantScheduler>,
}

impl TenantLane {
    pub fn new(source: Arc<dyn ListSource>, scheduler: Arc<TenantScheduler>) -> Self {
        Self { source, scheduler }
    }
}

impl fmt::Debug for TenantLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantLane")
            .field("tenant", &self.scheduler.tenant())
            .field("paused", &self.scheduler.is_paused())
            .field("queued", &self.scheduler.queued())
            .finish_non_exhaustive()
    }
}

/// Inbound request capability, independent of any transport.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Run `action` for `tenant` with the caller's optional params object.
    async fn handle(&self, tenant: &str, action: &str, params: Option<Value>) -> Result<Value>;
}
