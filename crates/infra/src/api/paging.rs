//! Fetch-all over paginated listings
//!
//! The cursor is derived from the previous request's own `offset`/`limit`
//! and the previous response's `pagination-limit`/`pagination-count`
//! headers. Pages are paced by a fixed delay and never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helpdesk_core::ListSource;
use helpdesk_domain::constants::{
    DEFAULT_MAX_PAGES, DEFAULT_PAGINATION_BACKOFF_MS, PARAM_LIMIT, PARAM_OFFSET,
};
use helpdesk_domain::{HttpConfig, ListEndpoint, SearchParams};
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::Page;
use super::errors::ApiError;

/// Fetches a single page of a listing.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page(&self, endpoint: ListEndpoint, params: &SearchParams) -> Result<Page, ApiError>;
}

/// Pacing and safety limits for a fetch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Delay before each follow-up page request
    pub backoff: Duration,
    /// Requests allowed in one fetch-all before it fails
    pub max_pages: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_millis(DEFAULT_PAGINATION_BACKOFF_MS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&HttpConfig> for PagingConfig {
    fn from(http: &HttpConfig) -> Self {
        Self { backoff: http.pagination_backoff(), max_pages: http.max_pages.max(1) }
    }
}

/// Parameters of the request following `sent`, or `None` when `sent`
/// fetched the last page.
///
/// Pagination ends when either header is missing, the page size is zero,
/// the next offset reaches the reported total, or a caller-supplied `limit`
/// would drop below one.
pub fn next_cursor(
    sent: &SearchParams,
    page_limit: Option<u64>,
    count: Option<u64>,
) -> Option<SearchParams> {
    let page_limit = page_limit.filter(|limit| *limit > 0)?;
    let count = count?;

    let offset = sent.get(PARAM_OFFSET).and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(0);
    let next_offset = offset.saturating_add(page_limit);
    if next_offset >= count {
        return None;
    }

    let mut next = sent.clone();
    if let Some(limit) = sent.get(PARAM_LIMIT) {
        let remaining = limit.trim().parse::<u64>().ok()?.checked_sub(page_limit)?;
        if remaining < 1 {
            return None;
        }
        next.set(PARAM_LIMIT, remaining.to_string());
    }
    next.set(PARAM_OFFSET, next_offset.to_string());

    Some(next)
}

/// Walks every page of a listing through a [`PageSource`].
pub struct PagingClient {
    source: Arc<dyn PageSource>,
    config: PagingConfig,
}

impl PagingClient {
    pub fn new(source: Arc<dyn PageSource>, config: PagingConfig) -> Self {
        Self { source, config }
    }

    /// Accumulate every page's items in server order.
    ///
    /// # Errors
    /// The first failing page aborts the walk; no items are returned.
    pub async fn collect(
        &self,
        endpoint: ListEndpoint,
        params: SearchParams,
    ) -> Result<Vec<Value>, ApiError> {
        let mut params = params;
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.config.max_pages {
                return Err(ApiError::TooManyPages(self.config.max_pages));
            }
            pages += 1;

            let page = self.source.page(endpoint, &params).await?;
            let Value::Array(batch) = page.body else {
                return Err(ApiError::Shape(format!("page {pages} is not a JSON array")));
            };
            debug!(page = pages, items = batch.len(), "page collected");
            items.extend(batch);

            match next_cursor(&params, page.limit, page.count) {
                Some(next) => {
                    params = next;
                    if !self.config.backoff.is_zero() {
                        tokio::time::sleep(self.config.backoff).await;
                    }
                }
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl ListSource for PagingClient {
    #[instrument(skip(self, params))]
    async fn fetch_all(
        &self,
        endpoint: ListEndpoint,
        params: SearchParams,
    ) -> helpdesk_domain::Result<Vec<Value>> {
        self.collect(endpoint, params).await.map_err(|err| err.into_list_error(endpoint))
    }
}
