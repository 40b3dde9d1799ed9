//! Diagnostic sink writing to `tracing`.

use wiki_application::ports::{DiagnosticEvent, DiagnosticSink};

/// Forwards pipeline events to the active `tracing` subscriber.
///
/// Successful traffic is logged at `debug`/`info`, failures at `warn`.
/// Request headers are logged by name only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        let label = event.label();
        match &event {
            DiagnosticEvent::RequestStarted { request } => {
                let headers: Vec<&str> = request.headers.iter().map(|h| h.name.as_str()).collect();
                tracing::debug!(
                    request_id = %request.id,
                    method = %request.method,
                    url = %request.url,
                    headers = ?headers,
                    "{label}"
                );
            }
            DiagnosticEvent::TokenAttached { header, value } => {
                tracing::debug!(header = %header, value = %value, "{label}");
            }
            DiagnosticEvent::RequestFailed { error } => {
                tracing::warn!(error = %error, "{label}");
            }
            DiagnosticEvent::ResponseReceived { response } => tracing::info!(
                status = response.status,
                size = response.size,
                duration_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
                "{label}"
            ),
            DiagnosticEvent::ResponseFailed { error } => {
                tracing::warn!(error = %error, status = ?error.status(), "{label}");
            }
        }
    }
}
