//! Shared API client.
//!
//! One instance is built at startup and shared by every caller. A request
//! travels: request interceptors, dispatch (URL resolution, default headers,
//! transport, status check), response interceptors.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use wiki_domain::request::{Headers, HttpMethod, RequestBody, RequestSpec, resolve_url};
use wiki_domain::response::ResponseSpec;

use crate::error::{HttpClientError, HttpResult};
use crate::interceptor::{InterceptorChain, InterceptorId, RequestInterceptor, ResponseInterceptor};
use crate::ports::HttpClient;

/// Accepts 2xx statuses.
#[must_use]
pub const fn default_validate_status(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Settings applied to every request sent through an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientDefaults {
    /// Prefix for relative request paths
    pub base_url: Option<String>,
    /// Headers added when the request does not set them itself
    pub headers: Headers,
    /// Timeout for requests without their own; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
    /// Decides which statuses are successes
    pub validate_status: fn(u16) -> bool,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Headers::new(),
            timeout_ms: None,
            validate_status: default_validate_status,
        }
    }
}

/// HTTP client with defaults and interceptor chains.
pub struct ApiClient<C: HttpClient> {
    client: Arc<C>,
    defaults: ClientDefaults,
    request_interceptors: InterceptorChain<dyn RequestInterceptor>,
    response_interceptors: InterceptorChain<dyn ResponseInterceptor>,
}

impl<C: HttpClient> ApiClient<C> {
    /// Creates a client with default settings and no interceptors.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_defaults(client, ClientDefaults::default())
    }

    /// Creates a client with the given defaults.
    pub fn with_defaults(client: Arc<C>, defaults: ClientDefaults) -> Self {
        Self {
            client,
            defaults,
            request_interceptors: InterceptorChain::new(),
            response_interceptors: InterceptorChain::new(),
        }
    }

    /// Returns the current defaults.
    pub const fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    /// Returns the defaults for modification.
    pub const fn defaults_mut(&mut self) -> &mut ClientDefaults {
        &mut self.defaults
    }

    /// Sets the prefix for relative request paths.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.defaults.base_url = Some(base_url.into());
    }

    /// Registers a request interceptor.
    pub fn intercept_requests(&mut self, interceptor: Arc<dyn RequestInterceptor>) -> InterceptorId {
        self.request_interceptors.register(interceptor)
    }

    /// Registers a response interceptor.
    pub fn intercept_responses(
        &mut self,
        interceptor: Arc<dyn ResponseInterceptor>,
    ) -> InterceptorId {
        self.response_interceptors.register(interceptor)
    }

    /// Removes a request interceptor. Returns false if the handle is unknown.
    pub fn eject_request(&mut self, id: InterceptorId) -> bool {
        self.request_interceptors.eject(id)
    }

    /// Removes a response interceptor. Returns false if the handle is unknown.
    pub fn eject_response(&mut self, id: InterceptorId) -> bool {
        self.response_interceptors.eject(id)
    }

    /// Sends a request through both chains.
    ///
    /// # Errors
    ///
    /// Returns whichever error survives the response chain: a pre-send
    /// failure, a transport failure, or a status rejected by
    /// `validate_status`.
    pub async fn send(&self, request: RequestSpec) -> HttpResult<ResponseSpec> {
        let outcome = match self.request_interceptors.run(Ok(request)) {
            Ok(request) => self.dispatch(request).await,
            Err(error) => Err(error),
        };
        self.response_interceptors.run(outcome)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get(&self, url: &str) -> HttpResult<ResponseSpec> {
        self.send(RequestSpec::get(url)).await
    }

    /// Sends a DELETE request without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, url: &str) -> HttpResult<ResponseSpec> {
        self.send(RequestSpec::new(HttpMethod::Delete, url)).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Fails before sending if `body` cannot be serialized; otherwise see
    /// [`ApiClient::send`].
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> HttpResult<ResponseSpec> {
        let body = RequestBody::to_json(body)?;
        self.send(RequestSpec::post(url, body)).await
    }

    /// Sends a DELETE request with a JSON body.
    ///
    /// # Errors
    ///
    /// Fails before sending if `body` cannot be serialized; otherwise see
    /// [`ApiClient::send`].
    pub async fn delete_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> HttpResult<ResponseSpec> {
        let body = RequestBody::to_json(body)?;
        self.send(RequestSpec::delete(url, body)).await
    }

    /// Applies client defaults. The result is exactly what the transport receives.
    fn prepare(&self, mut request: RequestSpec) -> HttpResult<RequestSpec> {
        request.url = resolve_url(self.defaults.base_url.as_deref(), &request.url)?;
        request.headers.merge_defaults(&self.defaults.headers);
        if request.timeout_ms.is_none() {
            request.timeout_ms = self.defaults.timeout_ms;
        }
        request.body.validate()?;
        Ok(request)
    }

    async fn dispatch(&self, request: RequestSpec) -> HttpResult<ResponseSpec> {
        let request = self.prepare(request)?;
        let response = self.client.execute(&request).await?;
        if (self.defaults.validate_status)(response.status) {
            Ok(response)
        } else {
            Err(HttpClientError::Status {
                response: Box::new(response),
            })
        }
    }
}

impl<C: HttpClient> fmt::Debug for ApiClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("defaults", &self.defaults)
            .field("request_interceptors", &self.request_interceptors)
            .field("response_interceptors", &self.response_interceptors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use wiki_domain::request::{Header, TOKEN_HEADER};

    use crate::augmentation::RequestAugmentation;
    use crate::diagnostics::MemorySink;
    use crate::ports::{DiagnosticEvent, DiagnosticSink};

    const BASE: &str = "http://wiki.local:8880";

    /// Transport stub that records what it was asked to send.
    struct MockHttpClient {
        status: u16,
        failure: Option<HttpClientError>,
        sent: Mutex<Vec<RequestSpec>>,
    }

    impl MockHttpClient {
        fn status(status: u16) -> Self {
            Self {
                status,
                failure: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: HttpClientError) -> Self {
            Self {
                status: 0,
                failure: Some(error),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<RequestSpec> {
            self.sent.lock().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: &RequestSpec,
        ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>>
        {
            self.sent.lock().push(request.clone());
            let result = self.failure.clone().map_or_else(
                || {
                    Ok(ResponseSpec::new(
                        self.status,
                        Headers::new(),
                        b"pong".to_vec(),
                        Duration::from_millis(3),
                    ))
                },
                Err,
            );
            Box::pin(async move { result })
        }
    }

    fn wired(
        transport: MockHttpClient,
        token: Option<&'static str>,
    ) -> (ApiClient<MockHttpClient>, Arc<MockHttpClient>, Arc<MemorySink>) {
        let transport = Arc::new(transport);
        let sink = Arc::new(MemorySink::new());
        let hook = Arc::new(RequestAugmentation::new(
            Arc::new(move || token.map(str::to_string)),
            Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
        ));

        let mut client = ApiClient::new(Arc::clone(&transport));
        client.set_base_url(BASE);
        client.intercept_requests(Arc::clone(&hook) as Arc<dyn RequestInterceptor>);
        client.intercept_responses(hook);
        (client, transport, sink)
    }

    #[tokio::test]
    async fn token_and_base_url_reach_the_transport() {
        let (client, transport, _) = wired(MockHttpClient::status(200), Some("abc123"));

        let response = client.get("/api/ping").await.expect("2xx passes");

        assert_eq!(response.body, "pong");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, format!("{BASE}/api/ping"));
        assert_eq!(sent[0].headers.get(TOKEN_HEADER), Some("abc123"));
    }

    #[tokio::test]
    async fn empty_token_sends_no_header() {
        let (client, transport, _) = wired(MockHttpClient::status(200), Some(""));

        client.get("/api/ping").await.expect("2xx passes");

        assert!(!transport.sent()[0].headers.contains(TOKEN_HEADER));
    }

    #[tokio::test]
    async fn server_error_fires_error_hook_and_rejects() {
        let (client, _, sink) = wired(MockHttpClient::status(500), Some("abc123"));

        let error = client.get("/api/ping").await.expect_err("500 rejects");

        assert_eq!(error.status(), Some(500));
        let events = sink.events();
        assert_eq!(
            events.last(),
            Some(&DiagnosticEvent::ResponseFailed {
                error: error.clone()
            })
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::ResponseReceived { .. })));
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let failure = HttpClientError::ConnectionRefused {
            host: "wiki.local".into(),
            port: 8880,
        };
        let (client, _, sink) = wired(MockHttpClient::failing(failure.clone()), None);

        let error = client.get("/api/ping").await.expect_err("transport fails");

        assert_eq!(error, failure);
        assert_eq!(
            sink.events().last(),
            Some(&DiagnosticEvent::ResponseFailed { error: failure })
        );
    }

    #[tokio::test]
    async fn pre_send_failure_skips_transport() {
        let transport = Arc::new(MockHttpClient::status(200));
        let sink = Arc::new(MemorySink::new());
        let hook = Arc::new(RequestAugmentation::new(
            Arc::new(|| None::<String>),
            Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
        ));
        let mut client = ApiClient::new(Arc::clone(&transport));
        client.intercept_responses(hook);

        let error = client.get("/api/ping").await.expect_err("no base URL");

        assert!(error.is_pre_send());
        assert!(transport.sent().is_empty());
        assert!(matches!(
            sink.events().as_slice(),
            [DiagnosticEvent::ResponseFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn defaults_fill_gaps_without_overriding() {
        let transport = Arc::new(MockHttpClient::status(200));
        let defaults = ClientDefaults {
            base_url: Some(BASE.to_string()),
            headers: [
                Header::new("Accept", "application/json"),
                Header::new("X-Client", "wiki-web"),
            ]
            .into_iter()
            .collect(),
            timeout_ms: Some(5_000),
            ..ClientDefaults::default()
        };
        let client = ApiClient::with_defaults(Arc::clone(&transport), defaults);

        let request = RequestSpec::get("https://cdn.example.com/a.json")
            .with_header("accept", "text/plain")
            .expect("valid header")
            .with_timeout_ms(250);
        client.send(request).await.expect("2xx passes");
        client.get("doc/all").await.expect("2xx passes");

        let sent = transport.sent();
        assert_eq!(sent[0].url, "https://cdn.example.com/a.json");
        assert_eq!(sent[0].headers.get("Accept"), Some("text/plain"));
        assert_eq!(sent[0].headers.get("X-Client"), Some("wiki-web"));
        assert_eq!(sent[0].timeout_ms, Some(250));
        assert_eq!(sent[1].url, format!("{BASE}/doc/all"));
        assert_eq!(sent[1].timeout_ms, Some(5_000));
    }

    #[tokio::test]
    async fn custom_status_validation() {
        let transport = Arc::new(MockHttpClient::status(404));
        let mut client = ApiClient::new(transport);
        client.set_base_url(BASE);
        client.defaults_mut().validate_status = |status| status < 500;

        let response = client.get("/missing").await.expect("404 accepted");
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn post_json_encodes_body_and_malformed_json_fails_pre_send() {
        let transport = Arc::new(MockHttpClient::status(200));
        let mut client = ApiClient::new(Arc::clone(&transport));
        client.set_base_url(BASE);

        client
            .post_json("/doc/save", &serde_json::json!({ "name": "Intro" }))
            .await
            .expect("2xx passes");

        let sent = transport.sent();
        assert_eq!(sent[0].body.content, r#"{"name":"Intro"}"#);
        assert_eq!(sent[0].body.content_type(), Some("application/json"));

        let bad = RequestSpec::post("/doc/save", RequestBody::json("{oops"));
        let error = client.send(bad).await.expect_err("invalid JSON");
        assert!(matches!(error, HttpClientError::InvalidBody(_)));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn delete_sends_no_body() {
        let transport = Arc::new(MockHttpClient::status(204));
        let mut client = ApiClient::new(Arc::clone(&transport));
        client.set_base_url(BASE);

        client.delete("/doc/7").await.expect("2xx passes");

        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert!(sent[0].body.is_empty());
    }

    #[tokio::test]
    async fn ejected_hook_no_longer_runs() {
        let transport = Arc::new(MockHttpClient::status(200));
        let sink = Arc::new(MemorySink::new());
        let hook = Arc::new(RequestAugmentation::new(
            Arc::new(|| Some("abc123".to_string())),
            Arc::clone(&sink) as Arc<dyn DiagnosticSink>,
        ));
        let mut client = ApiClient::new(Arc::clone(&transport));
        client.set_base_url(BASE);
        let request_id = client.intercept_requests(Arc::clone(&hook) as Arc<dyn RequestInterceptor>);
        let response_id = client.intercept_responses(hook);

        assert!(client.eject_request(request_id));
        assert!(client.eject_response(response_id));
        assert!(!client.eject_request(request_id));
        client.get("/api/ping").await.expect("2xx passes");

        assert!(!transport.sent()[0].headers.contains(TOKEN_HEADER));
        assert!(sink.is_empty());
    }
}
