//! Helpdesk request handler - core business logic

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_domain::{HelpdeskError, ListEndpoint, Result, SearchParams};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::ports::{RequestHandler, TenantDirectory};
use crate::schema::validate_list_params;

/// Validates calls, resolves the tenant and runs fetches on its scheduler.
pub struct HelpdeskService {
    directory: Arc<dyn TenantDirectory>,
}

impl HelpdeskService {
    /// Create a new service over `directory`
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }

    /// Fetch every item of `endpoint` for `tenant`.
    ///
    /// The fetch is queued behind earlier work for the same tenant.
    ///
    /// # Errors
    /// `UnknownTenant` without touching the network, `Unavailable` while the
    /// tenant is paused, otherwise whatever the fetch itself reports.
    #[instrument(skip(self, params), fields(params = params.len()))]
    pub async fn fetch_all(
        &self,
        tenant: &str,
        endpoint: ListEndpoint,
        params: SearchParams,
    ) -> Result<Vec<Value>> {
        let lane = self
            .directory
            .lane(tenant)
            .ok_or_else(|| HelpdeskError::UnknownTenant(tenant.to_string()))?;

        let source = Arc::clone(&lane.source);
        let ticket = lane.scheduler.submit(async move { source.fetch_all(endpoint, params).await })?;

        let items = ticket.await?;
        debug!(items = items.len(), "fetch-all completed");
        Ok(items)
    }
}

#[async_trait]
impl RequestHandler for HelpdeskService {
    #[instrument(skip(self, params))]
    async fn handle(&self, tenant: &str, action: &str, params: Option<Value>) -> Result<Value> {
        let endpoint = ListEndpoint::from_action(action)
            .ok_or_else(|| HelpdeskError::UnknownAction(action.to_string()))?;
        let search = validate_list_params(endpoint, params.as_ref())?;

        match self.fetch_all(tenant, endpoint, search).await {
            Ok(items) => Ok(Value::Array(items)),
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "request failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::ports::{ListSource, TenantLane};
    use crate::scheduler::TenantScheduler;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<(ListEndpoint, SearchParams)>>,
        fail: bool,
    }

    #[async_trait]
    impl ListSource for RecordingSource {
        async fn fetch_all(
            &self,
            endpoint: ListEndpoint,
            params: SearchParams,
        ) -> Result<Vec<Value>> {
            self.calls.lock().unwrap().push((endpoint, params));
            if self.fail {
                return Err(HelpdeskError::list(endpoint, "upstream returned 500"));
            }
            Ok(vec![json!({ "id": 1 }), json!({ "id": 2 })])
        }
    }

    struct MapDirectory(HashMap<String, TenantLane>);

    impl TenantDirectory for MapDirectory {
        fn lane(&self, tenant: &str) -> Option<TenantLane> {
            self.0.get(tenant).cloned()
        }

        fn tenants(&self) -> Vec<String> {
            self.0.keys().cloned().collect()
        }
    }

    fn service_with(source: Arc<RecordingSource>) -> (HelpdeskService, Arc<TenantScheduler>) {
        let scheduler = Arc::new(TenantScheduler::new("acme"));
        let lane = TenantLane::new(source, Arc::clone(&scheduler));
        let directory = MapDirectory(HashMap::from([("acme".to_string(), lane)]));
        (HelpdeskService::new(Arc::new(directory)), scheduler)
    }

    #[tokio::test]
    async fn handle_returns_items_and_forwards_search_params() {
        let source = Arc::new(RecordingSource::default());
        let (service, _) = service_with(Arc::clone(&source));

        let result = service
            .handle("acme", "getAgents", Some(json!({ "sort": "asc", "extra": 1 })))
            .await
            .unwrap();

        assert_eq!(result, json!([{ "id": 1 }, { "id": 2 }]));
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ListEndpoint::Agents);
        assert_eq!(calls[0].1, SearchParams::new().with("sort", "ASC"));
    }

    #[tokio::test]
    async fn rejections_never_reach_the_source() {
        let source = Arc::new(RecordingSource::default());
        let (service, scheduler) = service_with(Arc::clone(&source));

        let err = service.handle("acme", "deleteTeams", None).await.unwrap_err();
        assert_eq!(err, HelpdeskError::UnknownAction("deleteTeams".to_string()));

        let err = service.handle("acme", "getTeams", Some(json!({ "limit": "x" }))).await;
        assert!(matches!(err, Err(HelpdeskError::Validation(_))));

        let err = service.handle("nobody", "getTeams", None).await.unwrap_err();
        assert_eq!(err.to_string(), "ERR_API_HELPDESK_UNKNOWN: nobody");

        scheduler.pause();
        let err = service.handle("acme", "getTeams", None).await.unwrap_err();
        assert_eq!(err, HelpdeskError::unavailable());

        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_errors_reach_the_caller() {
        let source = Arc::new(RecordingSource { fail: true, ..Default::default() });
        let (service, _) = service_with(source);

        let err = service.handle("acme", "getDepartments", None).await.unwrap_err();
        assert_eq!(err.to_string(), "ERR_API_HELPDESK_LIST_DEPARTMENTS: upstream returned 500");
        assert_eq!(err.kind(), "upstream");
    }
}
