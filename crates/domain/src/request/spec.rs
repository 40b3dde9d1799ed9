//! Request descriptor type

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Headers, HttpMethod, RequestBody};
use crate::error::DomainResult;

/// An outgoing request as it travels through the interceptor chain.
///
/// `url` is usually a path relative to the client's base URL; it is only
/// resolved to an absolute URL when the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    pub id: Uuid,
    /// HTTP method
    pub method: HttpMethod,
    /// Target path or absolute URL
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Per-request timeout; `None` defers to the client defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            url: url.into(),
            headers: Headers::new(),
            body: RequestBody::none(),
            timeout_ms: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request carrying `body`.
    #[must_use]
    pub fn post(url: impl Into<String>, body: RequestBody) -> Self {
        Self::new(HttpMethod::Post, url).with_body(body)
    }

    /// Creates a DELETE request carrying `body`.
    #[must_use]
    pub fn delete(url: impl Into<String>, body: RequestBody) -> Self {
        Self::new(HttpMethod::Delete, url).with_body(body)
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets a header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name is invalid.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> DomainResult<Self> {
        self.headers.set(name, value)?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_has_no_body() {
        let req = RequestSpec::get("/api/ping");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_empty());
    }

    #[test]
    fn delete_keeps_body() {
        let req = RequestSpec::delete("/doc/delete", RequestBody::json(r#"{"ids":[3]}"#));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.body.content, r#"{"ids":[3]}"#);
    }

    #[test]
    fn builder_sets_header_and_timeout() {
        let req = RequestSpec::get("https://wiki.example.com/ebook/list")
            .with_header("Accept", "application/json")
            .unwrap()
            .with_timeout_ms(1500);

        assert_eq!(req.headers.get("accept"), Some("application/json"));
        assert_eq!(req.timeout_ms, Some(1500));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(RequestSpec::get("/a").id, RequestSpec::get("/a").id);
    }
}
