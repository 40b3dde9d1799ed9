//! HTTP transport port

use std::future::Future;
use std::pin::Pin;

use wiki_domain::{request::RequestSpec, response::ResponseSpec};

use crate::error::HttpClientError;

/// Port for transmitting a fully prepared request.
///
/// By the time a request reaches the transport its URL is absolute, client
/// default headers are merged in and every interceptor has run. Status codes
/// are not interpreted here; the API client decides which ones are failures.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be built or the exchange
    /// failed (DNS, connection, timeout).
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>>;
}
