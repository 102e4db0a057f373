//! End-to-end tests for the request pipeline
//!
//! Registry → scheduler → paging client → signer against a mock upstream.

use std::collections::BTreeMap;
use std::sync::Arc;

use helpdesk_core::{HelpdeskService, ListSource, RequestHandler, TenantDirectory};
use helpdesk_domain::constants::{
    HEADER_PAGINATION_COUNT, HEADER_PAGINATION_LIMIT, HEADER_V1_PAYLOAD, HEADER_V2_APIKEY,
    HEADER_V2_NONCE, HEADER_V2_SIGNATURE,
};
use helpdesk_domain::{
    Credentials, HelpdeskConfig, HelpdeskError, HttpConfig, ListEndpoint, Revision, SearchParams,
    TenantConfig,
};
use helpdesk_infra::TenantRegistry;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config(tenants: &[(&str, &str, Revision)]) -> HelpdeskConfig {
    HelpdeskConfig {
        server: Default::default(),
        http: HttpConfig { pagination_backoff_ms: 10, ..HttpConfig::default() },
        logging: Default::default(),
        helpdesk: tenants
            .iter()
            .map(|(name, url, revision)| {
                (
                    (*name).to_string(),
                    TenantConfig {
                        base_url: (*url).to_string(),
                        revision: *revision,
                        credentials: Credentials::new(format!("{name}-pub"), format!("{name}-sec")),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
    }
}

fn page(body: serde_json::Value, limit: u64, count: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header(HEADER_PAGINATION_LIMIT, limit.to_string().as_str())
        .insert_header(HEADER_PAGINATION_COUNT, count.to_string().as_str())
        .set_body_json(body)
}

fn header(request: &Request, name: &str) -> String {
    request.headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string()
}

#[tokio::test]
async fn acme_departments_walk_two_signed_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/departments"))
        .and(query_param("sort", "DESC"))
        .and(query_param_is_missing("offset"))
        .respond_with(page(json!([{ "id": 1, "href": "/d/1" }, { "id": 2 }]), 2, 3))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/departments"))
        .and(query_param("sort", "DESC"))
        .and(query_param("offset", "2"))
        .respond_with(page(json!([{ "id": 3 }]), 2, 3))
        .expect(1)
        .mount(&server)
        .await;

    let registry =
        Arc::new(TenantRegistry::from_config(&config(&[("acme", &server.uri(), Revision::V2)])).unwrap());
    let service = HelpdeskService::new(registry);

    let result = service
        .handle("acme", "getDepartments", Some(json!({ "sort": "desc" })))
        .await
        .unwrap();

    assert_eq!(result, json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let nonces: Vec<u64> =
        requests.iter().map(|r| header(r, HEADER_V2_NONCE).parse().unwrap()).collect();
    assert!(nonces[1] > nonces[0], "nonces must increase: {nonces:?}");
    for request in &requests {
        assert_eq!(header(request, HEADER_V2_APIKEY), "acme-pub");
        assert_eq!(header(request, HEADER_V2_SIGNATURE).len(), 96);
    }
}

#[tokio::test]
async fn unknown_tenant_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(page(json!([]), 1, 0)).expect(0).mount(&server).await;

    let registry =
        Arc::new(TenantRegistry::from_config(&config(&[("acme", &server.uri(), Revision::V2)])).unwrap());
    let service = HelpdeskService::new(registry);

    let err = service
        .fetch_all("globex", ListEndpoint::Departments, SearchParams::new())
        .await
        .unwrap_err();

    assert_eq!(err, HelpdeskError::UnknownTenant("globex".to_string()));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_page_returns_endpoint_error_without_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("offset"))
        .respond_with(page(json!([{ "id": 1 }]), 1, 3))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let registry =
        Arc::new(TenantRegistry::from_config(&config(&[("acme", &server.uri(), Revision::V2)])).unwrap());
    let service = HelpdeskService::new(registry);

    let err = service.handle("acme", "getAgents", None).await.unwrap_err();

    assert_eq!(err.to_string(), "ERR_API_HELPDESK_LIST_STAFF: upstream returned 502: bad gateway");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn v1_tenant_sends_payload_header_and_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tags"))
        .respond_with(page(json!([{ "id": 9 }]), 10, 1))
        .expect(1)
        .mount(&server)
        .await;

    let registry = Arc::new(
        TenantRegistry::from_config(&config(&[("legacy", &server.uri(), Revision::V1)])).unwrap(),
    );
    let service = HelpdeskService::new(registry);

    let items = service.handle("legacy", "getTags", None).await.unwrap();
    assert_eq!(items, json!([{ "id": 9 }]));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(!header(&requests[0], HEADER_V1_PAYLOAD).is_empty());
}

#[tokio::test]
async fn pause_then_drain_finishes_accepted_work_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(page(json!([{ "id": 1 }]), 1, 1).set_delay(std::time::Duration::from_millis(50)))
        .mount(&server)
        .await;

    let registry =
        Arc::new(TenantRegistry::from_config(&config(&[("acme", &server.uri(), Revision::V2)])).unwrap());
    let lane = registry.lane("acme").unwrap();

    let source = Arc::clone(&lane.source);
    let accepted = lane
        .scheduler
        .submit(async move { source.fetch_all(ListEndpoint::Topics, SearchParams::new()).await })
        .unwrap();

    registry.pause_all();
    let rejected = lane.scheduler.submit(async { Ok::<_, HelpdeskError>(()) });
    assert!(matches!(rejected, Err(ref err) if *err == HelpdeskError::unavailable()));

    registry.drain_all().await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(accepted.await.unwrap(), vec![json!({ "id": 1 })]);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
