//! Request and response interceptor chains.
//!
//! Request interceptors run newest first, response interceptors run in
//! registration order, the same as axios. Each step sees either the value produced by the
//! previous step or the error it raised.

use std::fmt;
use std::sync::Arc;

use wiki_domain::{request::RequestSpec, response::ResponseSpec};

use crate::error::{HttpClientError, HttpResult};

/// Hook running before a request is dispatched.
pub trait RequestInterceptor: Send + Sync {
    /// Inspects or augments an outgoing request.
    ///
    /// # Errors
    ///
    /// An error stops the request from being sent.
    fn on_request(&self, request: RequestSpec) -> HttpResult<RequestSpec> {
        Ok(request)
    }

    /// Handles an error raised by a previous request step.
    ///
    /// # Errors
    ///
    /// Returning the error keeps the request rejected; returning `Ok`
    /// recovers with a replacement request.
    fn on_request_error(&self, error: HttpClientError) -> HttpResult<RequestSpec> {
        Err(error)
    }
}

/// Hook running after a response, or a failure, is received.
pub trait ResponseInterceptor: Send + Sync {
    /// Inspects a successful response.
    ///
    /// # Errors
    ///
    /// An error turns the response into a failure for the caller.
    fn on_response(&self, response: ResponseSpec) -> HttpResult<ResponseSpec> {
        Ok(response)
    }

    /// Handles a failure raised during or after the exchange.
    ///
    /// # Errors
    ///
    /// Returning the error propagates it to the caller.
    fn on_response_error(&self, error: HttpClientError) -> HttpResult<ResponseSpec> {
        Err(error)
    }
}

/// Handle returned on registration, used to eject an interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(u64);

/// Ordered set of interceptors of one kind.
pub struct InterceptorChain<I: ?Sized> {
    next_id: u64,
    entries: Vec<(InterceptorId, Arc<I>)>,
}

impl<I: ?Sized> InterceptorChain<I> {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Registers an interceptor and returns its handle.
    pub fn register(&mut self, interceptor: Arc<I>) -> InterceptorId {
        let id = InterceptorId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, interceptor));
        id
    }

    /// Removes an interceptor. Returns false if the handle is unknown.
    pub fn eject(&mut self, id: InterceptorId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        before != self.entries.len()
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl InterceptorChain<dyn RequestInterceptor> {
    /// Runs the chain, most recently registered interceptor first.
    ///
    /// # Errors
    ///
    /// Returns the error left after the last step, if any.
    pub fn run(&self, request: HttpResult<RequestSpec>) -> HttpResult<RequestSpec> {
        self.entries
            .iter()
            .rev()
            .fold(request, |state, (_, interceptor)| match state {
                Ok(request) => interceptor.on_request(request),
                Err(error) => interceptor.on_request_error(error),
            })
    }
}

impl InterceptorChain<dyn ResponseInterceptor> {
    /// Runs the chain in registration order.
    ///
    /// # Errors
    ///
    /// Returns the error left after the last step, if any.
    pub fn run(&self, outcome: HttpResult<ResponseSpec>) -> HttpResult<ResponseSpec> {
        self.entries
            .iter()
            .fold(outcome, |state, (_, interceptor)| match state {
                Ok(response) => interceptor.on_response(response),
                Err(error) => interceptor.on_response_error(error),
            })
    }
}

impl<I: ?Sized> Default for InterceptorChain<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> fmt::Debug for InterceptorChain<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    /// Appends its tag to a shared log and to an `x-trace` header.
    struct Tagger {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl RequestInterceptor for Tagger {
        fn on_request(&self, mut request: RequestSpec) -> HttpResult<RequestSpec> {
            self.log.lock().push(self.tag);
            let trace = request.headers.get("x-trace").unwrap_or("").to_string();
            request.headers.set("x-trace", format!("{trace}{}", self.tag))?;
            Ok(request)
        }
    }

    impl ResponseInterceptor for Tagger {
        fn on_response(&self, mut response: ResponseSpec) -> HttpResult<ResponseSpec> {
            self.log.lock().push(self.tag);
            response.body.push_str(self.tag);
            Ok(response)
        }
    }

    struct Reject;

    impl RequestInterceptor for Reject {
        fn on_request(&self, _request: RequestSpec) -> HttpResult<RequestSpec> {
            Err(HttpClientError::Rejected("blocked".into()))
        }
    }

    fn tagger(tag: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<Tagger> {
        Arc::new(Tagger {
            tag,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn request_chain_runs_newest_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: InterceptorChain<dyn RequestInterceptor> = InterceptorChain::new();
        chain.register(tagger("a", &log));
        chain.register(tagger("b", &log));

        let request = chain.run(Ok(RequestSpec::get("/x"))).expect("passes");

        assert_eq!(*log.lock(), vec!["b", "a"]);
        assert_eq!(request.headers.get("x-trace"), Some("ba"));
    }

    #[test]
    fn response_chain_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: InterceptorChain<dyn ResponseInterceptor> = InterceptorChain::new();
        chain.register(tagger("a", &log));
        chain.register(tagger("b", &log));

        let response = chain.run(Ok(ResponseSpec::default())).expect("passes");

        assert_eq!(*log.lock(), vec!["a", "b"]);
        assert_eq!(response.body, "ab");
    }

    #[test]
    fn rejection_skips_remaining_success_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: InterceptorChain<dyn RequestInterceptor> = InterceptorChain::new();
        chain.register(tagger("runs-after-reject", &log));
        chain.register(Arc::new(Reject));

        let result = chain.run(Ok(RequestSpec::get("/x")));

        assert_eq!(result, Err(HttpClientError::Rejected("blocked".into())));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn eject_removes_only_that_interceptor() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain: InterceptorChain<dyn RequestInterceptor> = InterceptorChain::new();
        let first = chain.register(tagger("a", &log));
        chain.register(tagger("b", &log));

        assert!(chain.eject(first));
        assert!(!chain.eject(first));
        assert_eq!(chain.len(), 1);

        chain.run(Ok(RequestSpec::get("/x"))).expect("passes");
        assert_eq!(*log.lock(), vec!["b"]);
    }

    #[test]
    fn empty_chain_passes_errors_through() {
        let chain: InterceptorChain<dyn ResponseInterceptor> = InterceptorChain::default();
        let error = HttpClientError::Timeout { timeout_ms: 5 };
        assert_eq!(chain.run(Err(error.clone())), Err(error));
    }
}
