//! HTTP Request domain types

mod body;
mod header;
mod method;
mod resolve;
mod spec;

pub use body::{RequestBody, RequestBodyKind};
pub use header::{Header, Headers, TOKEN_HEADER};
pub use method::HttpMethod;
pub use resolve::{combine_url, is_absolute_url, resolve_url};
pub use spec::RequestSpec;
