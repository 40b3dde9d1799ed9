//! Session token port

/// Read-only access to the current session token.
///
/// The pipeline never writes through this port; login and logout update the
/// session elsewhere.
pub trait SessionStore: Send + Sync {
    /// Returns the current token, which may be absent or empty.
    fn token(&self) -> Option<String>;
}

impl<F> SessionStore for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
