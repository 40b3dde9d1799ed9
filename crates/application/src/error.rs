//! HTTP pipeline error types

use thiserror::Error;
use wiki_domain::DomainError;
use wiki_domain::response::ResponseSpec;

/// Errors raised while preparing, sending or validating a request.
///
/// The first four variants happen before anything reaches the network
/// (see [`HttpClientError::is_pre_send`]); the rest are response failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The request URL could not be resolved or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value cannot be transmitted.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The request body is malformed.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An interceptor refused to let the request through.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve
        host: String,
        /// Resolver message
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit
        max: usize,
    },

    /// The server answered with a status the client treats as a failure.
    #[error("request failed with status code {}", .response.status)]
    Status {
        /// The rejected response, unchanged
        response: Box<ResponseSpec>,
    },

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true if the request failed before it could be sent.
    #[must_use]
    pub const fn is_pre_send(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_) | Self::InvalidHeader(_) | Self::InvalidBody(_) | Self::Rejected(_)
        )
    }

    /// Returns the response carried by a status failure.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSpec> {
        match self {
            Self::Status { response } => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status of a status failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

impl From<DomainError> for HttpClientError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidUrl(msg) => Self::InvalidUrl(msg),
            DomainError::InvalidHeaderName(name) => Self::InvalidHeader(name),
            DomainError::InvalidBody(msg) => Self::InvalidBody(msg),
        }
    }
}

/// Result type alias for pipeline operations.
pub type HttpResult<T> = Result<T, HttpClientError>;
