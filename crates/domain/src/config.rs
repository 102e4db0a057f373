//! Configuration structures
//!
//! Deserialized once at startup; see `helpdesk_infra::config` for how the
//! file is located and parsed.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_BIND, DEFAULT_MAX_PAGES, DEFAULT_PAGINATION_BACKOFF_MS, DEFAULT_SERVICE_PREFIX,
    DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use crate::errors::{HelpdeskError, Result};
use crate::types::{Credentials, Revision};

/// Top-level worker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpdeskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Tenant name → tenant settings
    #[serde(default)]
    pub helpdesk: BTreeMap<String, TenantConfig>,
}

/// Inbound RPC adapter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Service names are `<service_prefix>:<tenant>`
    pub service_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: DEFAULT_BIND.to_string(), service_prefix: DEFAULT_SERVICE_PREFIX.to_string() }
    }
}

/// Outbound HTTP settings shared by every tenant client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub pagination_backoff_ms: u64,
    pub max_pages: usize,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pagination_backoff(&self) -> Duration {
        Duration::from_millis(self.pagination_backoff_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            pagination_backoff_ms: DEFAULT_PAGINATION_BACKOFF_MS,
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

/// One configured upstream account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(alias = "baseUrl")]
    pub base_url: String,
    #[serde(default)]
    pub revision: Revision,
    #[serde(flatten)]
    pub credentials: Credentials,
}

impl TenantConfig {
    /// Prefix URL for every request of this tenant: base URL + revision root.
    pub fn prefix_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            HelpdeskError::Config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), self.revision.root());
        Url::parse(&joined)
            .map_err(|e| HelpdeskError::Config(format!("invalid prefix url '{joined}': {e}")))
    }
}

impl HelpdeskConfig {
    /// Check the invariants startup relies on.
    ///
    /// # Errors
    /// Returns `HelpdeskError::Config` naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        if self.helpdesk.is_empty() {
            return Err(HelpdeskError::Config("no helpdesk tenants configured".to_string()));
        }

        if self.http.timeout_ms == 0 {
            return Err(HelpdeskError::Config("http.timeout_ms must be positive".to_string()));
        }

        for (name, tenant) in &self.helpdesk {
            if name.trim().is_empty() {
                return Err(HelpdeskError::Config("tenant name must not be empty".to_string()));
            }
            tenant.prefix_url().map_err(|e| {
                HelpdeskError::Config(format!("tenant '{name}': {e}"))
            })?;
            if tenant.credentials.public_key.is_empty() || tenant.credentials.private_key.is_empty()
            {
                return Err(HelpdeskError::Config(format!(
                    "tenant '{name}': public_key and private_key are required"
                )));
            }
        }

        Ok(())
    }
}
