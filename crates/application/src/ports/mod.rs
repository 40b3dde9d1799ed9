//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the request pipeline and the systems it
//! depends on. Each port is a trait implemented by adapters in the
//! infrastructure layer, or by stubs in tests.

mod diagnostic_sink;
mod http_client;
mod session_store;

pub use diagnostic_sink::{DiagnosticEvent, DiagnosticSink};
pub use http_client::HttpClient;
pub use session_store::SessionStore;
