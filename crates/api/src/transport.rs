//! Inbound JSON-over-HTTP adapter
//!
//! `POST /rpc` carries `{ service, action, args }` and always answers 200 with
//! either `{ result }` or `{ error, kind }`. `GET /health` reports every
//! tenant scheduler.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use helpdesk_core::RequestHandler;
use helpdesk_domain::HelpdeskError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::utils::logging::log_call_outcome;
use crate::AppContext;

/// One inbound call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcRequest {
    /// `<service_prefix>:<tenant>`
    pub service: String,
    pub action: String,
    /// Positional arguments; only the first (list params) is read.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Exactly one outcome per call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Success { result: Value },
    Failure { error: String, kind: String },
}

impl From<HelpdeskError> for RpcResponse {
    fn from(err: HelpdeskError) -> Self {
        Self::Failure { error: err.to_string(), kind: err.kind().to_string() }
    }
}

#[derive(Debug, Serialize)]
struct TenantHealth {
    paused: bool,
    queued: usize,
}

#[derive(Debug, Serialize)]
struct HealthReport {
    shutting_down: bool,
    tenants: BTreeMap<String, TenantHealth>,
}

/// Routes of the inbound adapter.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new().route("/rpc", post(rpc)).route("/health", get(health)).with_state(ctx)
}

async fn rpc(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<RpcRequest>, JsonRejection>,
) -> Json<RpcResponse> {
    let response = match payload {
        Ok(Json(request)) => dispatch(&ctx, request).await,
        Err(rejection) => {
            HelpdeskError::Validation(format!("malformed request: {}", rejection.body_text()))
                .into()
        }
    };
    Json(response)
}

/// Route one call to the request handler of its tenant.
pub async fn dispatch(ctx: &AppContext, request: RpcRequest) -> RpcResponse {
    let RpcRequest { service, action, args } = request;
    let span = info_span!("rpc", request_id = %Uuid::new_v4(), %service, %action);

    async move {
        let started = Instant::now();

        let Some(tenant) = ctx.tenant_for_service(&service) else {
            let err = HelpdeskError::UnknownTenant(service.clone());
            log_call_outcome(&service, &action, started.elapsed(), Err(&err));
            return err.into();
        };

        let outcome = if ctx.shutdown.is_cancelled() {
            Err(HelpdeskError::unavailable())
        } else {
            ctx.handler.handle(tenant, &action, args.into_iter().next()).await
        };

        match outcome {
            Ok(result) => {
                let items = result.as_array().map_or(0, Vec::len);
                log_call_outcome(tenant, &action, started.elapsed(), Ok(items));
                RpcResponse::Success { result }
            }
            Err(err) => {
                log_call_outcome(tenant, &action, started.elapsed(), Err(&err));
                err.into()
            }
        }
    }
    .instrument(span)
    .await
}

async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthReport> {
    let tenants = ctx
        .registry
        .snapshot()
        .into_iter()
        .map(|status| (status.name, TenantHealth { paused: status.paused, queued: status.queued }))
        .collect();

    Json(HealthReport { shutting_down: ctx.shutdown.is_cancelled(), tenants })
}
