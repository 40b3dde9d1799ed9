//! Request augmentation hook.
//!
//! Installed on both interceptor chains of the shared client. On the way out
//! it records the request and stamps the session token into the `token`
//! header; on the way back it records the response or failure. Nothing is
//! retried, recovered or swallowed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wiki_domain::is_not_empty;
use wiki_domain::request::{Header, RequestSpec, TOKEN_HEADER};
use wiki_domain::response::ResponseSpec;

use crate::error::{HttpClientError, HttpResult};
use crate::interceptor::{RequestInterceptor, ResponseInterceptor};
use crate::ports::{DiagnosticEvent, DiagnosticSink, SessionStore};

const REDACTED: &str = "<redacted>";

/// How the token value appears in diagnostic events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenLogging {
    /// Only the fact that a token was attached is logged.
    #[default]
    Redacted,
    /// The token value is logged as is.
    Plaintext,
}

impl TokenLogging {
    fn render(self, token: &str) -> String {
        match self {
            Self::Redacted => REDACTED.to_string(),
            Self::Plaintext => token.to_string(),
        }
    }
}

/// Stamps the session token on outgoing requests and logs the exchange.
pub struct RequestAugmentation {
    session: Arc<dyn SessionStore>,
    sink: Arc<dyn DiagnosticSink>,
    token_logging: TokenLogging,
}

impl RequestAugmentation {
    /// Creates the hook with a token accessor and a diagnostic sink.
    #[must_use]
    pub fn new(session: Arc<dyn SessionStore>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            session,
            sink,
            token_logging: TokenLogging::default(),
        }
    }

    /// Sets how token values are logged.
    #[must_use]
    pub const fn with_token_logging(mut self, token_logging: TokenLogging) -> Self {
        self.token_logging = token_logging;
        self
    }

    /// Records the request and attaches the token when the session has one.
    #[must_use]
    pub fn augment(&self, mut request: RequestSpec) -> RequestSpec {
        self.sink.record(DiagnosticEvent::RequestStarted {
            request: self.loggable(&request),
        });

        let token = self.session.token();
        if let Some(token) = token.filter(|t| is_not_empty(Some(t.as_str()))) {
            let value = self.token_logging.render(&token);
            request.headers.insert(Header::new(TOKEN_HEADER, token));
            self.sink.record(DiagnosticEvent::TokenAttached {
                header: TOKEN_HEADER.to_string(),
                value,
            });
        }
        request
    }

    /// Copy of `request` safe to hand to the sink under the logging policy.
    fn loggable(&self, request: &RequestSpec) -> RequestSpec {
        let mut snapshot = request.clone();
        if self.token_logging == TokenLogging::Redacted && snapshot.headers.contains(TOKEN_HEADER) {
            snapshot.headers.insert(Header::new(TOKEN_HEADER, REDACTED));
        }
        snapshot
    }
}

impl RequestInterceptor for RequestAugmentation {
    fn on_request(&self, request: RequestSpec) -> HttpResult<RequestSpec> {
        Ok(self.augment(request))
    }

    fn on_request_error(&self, error: HttpClientError) -> HttpResult<RequestSpec> {
        self.sink.record(DiagnosticEvent::RequestFailed {
            error: error.clone(),
        });
        Err(error)
    }
}

impl ResponseInterceptor for RequestAugmentation {
    fn on_response(&self, response: ResponseSpec) -> HttpResult<ResponseSpec> {
        self.sink.record(DiagnosticEvent::ResponseReceived {
            response: response.clone(),
        });
        Ok(response)
    }

    fn on_response_error(&self, error: HttpClientError) -> HttpResult<ResponseSpec> {
        self.sink.record(DiagnosticEvent::ResponseFailed {
            error: error.clone(),
        });
        Err(error)
    }
}
