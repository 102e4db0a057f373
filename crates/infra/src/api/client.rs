//! Tenant-bound helpdesk API client
//!
//! One [`HelpdeskClient`] exists per tenant. It owns the tenant's prefix URL
//! and a [`SigningHook`] carrying its credentials, and fetches exactly one
//! page per call.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_domain::constants::{HEADER_PAGINATION_COUNT, HEADER_PAGINATION_LIMIT};
use helpdesk_domain::{HttpConfig, ListEndpoint, SearchParams, TenantConfig};
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::auth::SigningHook;
use super::errors::ApiError;
use super::json::parse_sanitized;
use super::paging::PageSource;
use crate::http::HttpClient;

const ERROR_BODY_LIMIT: usize = 512;

/// One response of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Sanitized response body
    pub body: Value,
    /// `pagination-limit` header, when present and numeric
    pub limit: Option<u64>,
    /// `pagination-count` header, when present and numeric
    pub count: Option<u64>,
}

/// HTTP client bound to one tenant's base URL, revision and credentials.
///
/// Holds no lock: callers must go through the tenant's scheduler so that
/// nonces reach the upstream in order.
pub struct HelpdeskClient {
    http: HttpClient,
    prefix: Url,
}

impl HelpdeskClient {
    /// Build the bound client for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the prefix URL is invalid or the
    /// underlying HTTP client cannot be built.
    pub fn new(tenant: &TenantConfig, http: &HttpConfig) -> Result<Self, ApiError> {
        let prefix = tenant.prefix_url().map_err(|e| ApiError::Config(e.to_string()))?;
        let hook = SigningHook::new(Arc::new(tenant.credentials.clone()));

        let http = HttpClient::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.clone())
            .hook(Arc::new(hook))
            .build()?;

        Ok(Self { http, prefix })
    }

    pub fn prefix(&self) -> &Url {
        &self.prefix
    }

    /// Absolute URL of `endpoint` under this tenant's prefix.
    pub fn endpoint_url(&self, endpoint: ListEndpoint) -> Result<Url, ApiError> {
        let joined = format!("{}/{}", self.prefix.as_str().trim_end_matches('/'), endpoint.path());
        Url::parse(&joined).map_err(|e| ApiError::Config(format!("invalid url '{joined}': {e}")))
    }

    /// GET one page of `endpoint`.
    #[instrument(skip(self, params), fields(offset = ?params.get("offset")))]
    pub async fn get_page(
        &self,
        endpoint: ListEndpoint,
        params: &SearchParams,
    ) -> Result<Page, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        let mut builder = self.http.request(Method::GET, url);
        if !params.is_empty() {
            builder = builder.query(params.as_pairs());
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        let page = Page {
            body: parse_sanitized(&bytes)?,
            limit: numeric_header(&headers, HEADER_PAGINATION_LIMIT),
            count: numeric_header(&headers, HEADER_PAGINATION_COUNT),
        };
        debug!(limit = ?page.limit, count = ?page.count, "page received");
        Ok(page)
    }
}

#[async_trait]
impl PageSource for HelpdeskClient {
    async fn page(&self, endpoint: ListEndpoint, params: &SearchParams) -> Result<Page, ApiError> {
        self.get_page(endpoint, params).await
    }
}

fn numeric_header(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
