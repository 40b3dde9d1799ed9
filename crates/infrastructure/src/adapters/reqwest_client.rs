//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It receives requests whose
//! URL is already absolute and whose headers are final; it only translates
//! them to reqwest and maps failures back to `HttpClientError`.

use std::error::Error as _;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use wiki_application::ports::HttpClient;
use wiki_application::HttpClientError;
use wiki_domain::{
    request::{Header, Headers, HttpMethod, RequestBody, RequestBodyKind, RequestSpec},
    response::ResponseSpec,
};

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - No global timeout (requests carry their own)
    /// - Follow redirects: up to 10
    /// - User-Agent: "wiki-client/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("wiki-client/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    fn to_header_pair(header: &Header) -> Result<(HeaderName, HeaderValue), HttpClientError> {
        let name = HeaderName::from_bytes(header.name.as_bytes())
            .map_err(|e| HttpClientError::InvalidHeader(format!("{}: {e}", header.name)))?;
        let value = HeaderValue::from_str(&header.value)
            .map_err(|e| HttpClientError::InvalidHeader(format!("{}: {e}", header.name)))?;
        Ok((name, value))
    }

    fn attach_body(
        builder: reqwest::RequestBuilder,
        method: HttpMethod,
        headers: &Headers,
        body: &RequestBody,
    ) -> reqwest::RequestBuilder {
        if !method.sends_body() || matches!(body.kind, RequestBodyKind::None) {
            return builder;
        }
        let builder = match body.content_type() {
            Some(content_type) if !headers.contains("content-type") => {
                builder.header(reqwest::header::CONTENT_TYPE, content_type)
            }
            _ => builder,
        };
        builder.body(body.content.clone())
    }

    /// Flattens an error and its sources into one line.
    fn describe(error: &reqwest::Error) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    fn map_error(error: &reqwest::Error, timeout_ms: Option<u64>) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: timeout_ms.unwrap_or_default(),
            };
        }

        let message = Self::describe(error);
        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_builder() {
            return HttpClientError::InvalidUrl(message);
        }

        HttpClientError::Other(message)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>> {
        let method = request.method;
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();
        let timeout_ms = request.timeout_ms;

        Box::pin(async move {
            let parsed_url =
                Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), parsed_url);
            if let Some(ms) = timeout_ms {
                builder = builder.timeout(Duration::from_millis(ms));
            }
            for header in &headers {
                let (name, value) = Self::to_header_pair(header)?;
                builder = builder.header(name, value);
            }
            builder = Self::attach_body(builder, method, &headers, &body);

            let start = Instant::now();
            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status();
            let response_headers: Headers = response
                .headers()
                .iter()
                .map(|(k, v)| Header::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?
                .to_vec();

            Ok(ResponseSpec::new(
                status.as_u16(),
                response_headers,
                body_bytes,
                start.elapsed(),
            )
            .with_status_text(status.canonical_reason().unwrap_or_default()))
        })
    }
}
