//! Wiki Application - Request pipeline and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, session token, diagnostic sink)
//! - Interceptor chains and the request augmentation hook
//! - The shared API client that runs requests through the chains

pub mod api_client;
pub mod augmentation;
pub mod diagnostics;
pub mod error;
pub mod interceptor;
pub mod ports;
pub mod session;

pub use api_client::{ApiClient, ClientDefaults, default_validate_status};
pub use augmentation::{RequestAugmentation, TokenLogging};
pub use diagnostics::MemorySink;
pub use error::{HttpClientError, HttpResult};
pub use interceptor::{InterceptorChain, InterceptorId, RequestInterceptor, ResponseInterceptor};
pub use ports::{DiagnosticEvent, DiagnosticSink, HttpClient, SessionStore};
pub use session::LocalSession;
