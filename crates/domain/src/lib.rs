//! Wiki Domain - Core types for the web client
//!
//! This crate defines the request/response model that flows through the
//! shared HTTP client and its interceptors, plus the local user session.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod session;

pub use error::{DomainError, DomainResult};
pub use session::{LocalUser, is_not_empty};
