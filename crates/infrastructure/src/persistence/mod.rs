//! File-based persistence

mod session_repository;

pub use session_repository::{SessionError, SessionRepository};
