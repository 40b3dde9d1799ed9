//! Diagnostic sink port

use std::fmt;

use wiki_domain::{request::RequestSpec, response::ResponseSpec};

use crate::error::HttpClientError;

/// Something worth telling a developer about a request in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A request entered the interceptor chain.
    RequestStarted {
        /// The descriptor as the caller built it
        request: RequestSpec,
    },
    /// The session token was written to a request header.
    TokenAttached {
        /// Header that received the token
        header: String,
        /// Token as it may be logged (see `TokenLogging`)
        value: String,
    },
    /// A request failed before it could be sent.
    RequestFailed {
        /// The failure, as propagated to the caller
        error: HttpClientError,
    },
    /// A response passed status validation.
    ResponseReceived {
        /// The response, unchanged
        response: ResponseSpec,
    },
    /// The exchange failed or the response was rejected.
    ResponseFailed {
        /// The failure, as propagated to the caller
        error: HttpClientError,
    },
}

impl DiagnosticEvent {
    /// Short label describing the event.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestStarted { .. } => "request parameters",
            Self::TokenAttached { .. } => "request header token added",
            Self::RequestFailed { .. } => "request error",
            Self::ResponseReceived { .. } => "response received",
            Self::ResponseFailed { .. } => "response error",
        }
    }

    /// Returns true for the two failure events.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::ResponseFailed { .. })
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestStarted { request } => {
                write!(f, "{}: {} {}", self.label(), request.method, request.url)
            }
            Self::TokenAttached { header, value } => {
                write!(f, "{}: {header}={value}", self.label())
            }
            Self::RequestFailed { error } | Self::ResponseFailed { error } => {
                write!(f, "{}: {error}", self.label())
            }
            Self::ResponseReceived { response } => write!(
                f,
                "{}: {} ({} bytes in {}ms)",
                self.label(),
                response.status,
                response.size,
                response.duration.as_millis()
            ),
        }
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    /// Records one event. Must not block.
    fn record(&self, event: DiagnosticEvent);
}
