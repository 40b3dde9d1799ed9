//! Infrastructure adapters

mod reqwest_client;
mod tracing_sink;

pub use reqwest_client::ReqwestHttpClient;
pub use tracing_sink::TracingSink;
