use std::sync::Arc;
use std::time::Duration;

use helpdesk_domain::constants::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::debug;

use crate::api::errors::ApiError;

/// Mutates every outgoing request right before it is executed.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: &mut Request) -> Result<(), ApiError>;
}

/// HTTP client with a fixed timeout and request hooks.
///
/// Requests are attempted exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Build the request, run every hook over it and execute it.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = builder.build()?;
        for hook in &self.hooks {
            hook.on_request(&mut request)?;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(err.into())
            }
        }
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            default_headers: None,
            hooks: Vec::new(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Hooks run in registration order.
    pub fn hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| ApiError::Config(err.to_string()))?;

        Ok(HttpClient { client, hooks: self.hooks })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::header::HeaderValue;
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct StampHook;

    impl RequestHook for StampHook {
        fn on_request(&self, request: &mut Request) -> Result<(), ApiError> {
            request.headers_mut().insert("x-stamp", HeaderValue::from_static("1"));
            Ok(())
        }
    }

    struct RefuseHook;

    impl RequestHook for RefuseHook {
        fn on_request(&self, _request: &mut Request) -> Result<(), ApiError> {
            Err(ApiError::Signing("no key".into()))
        }
    }

    #[tokio::test]
    async fn hooks_mutate_outgoing_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-stamp", "1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().hook(Arc::new(StampHook)).build().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn failing_hook_prevents_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::builder().hook(Arc::new(RefuseHook)).build().unwrap();
        let result = client.send(client.request(Method::GET, server.uri())).await;
        assert!(matches!(result, Err(ApiError::Signing(_))));
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;
        assert!(matches!(result, Err(ApiError::Network(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let result = client.send(client.request(Method::GET, server.uri())).await;
        assert!(matches!(result, Err(ApiError::Timeout(_))), "got {result:?}");
    }
}
