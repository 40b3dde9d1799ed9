//! Base URL resolution

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Returns true if `url` carries a scheme (`https://`) or is protocol-relative (`//host`).
#[must_use]
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    scheme_ok && rest.starts_with("//")
}

/// Joins `base` and `path` with exactly one slash between them.
///
/// An empty `path` yields `base` unchanged.
#[must_use]
pub fn combine_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Resolves the URL a request is sent to.
///
/// Absolute URLs are kept as they are; relative paths are prefixed with
/// `base` when one is configured. The result is checked but not normalized,
/// so it is exactly the configured base followed by the path.
///
/// # Errors
///
/// Returns [`DomainError::InvalidUrl`] if the resolved URL is empty or does
/// not parse.
pub fn resolve_url(base: Option<&str>, url: &str) -> DomainResult<String> {
    let resolved = match base {
        Some(base) if !base.is_empty() && !is_absolute_url(url) => combine_url(base, url),
        _ => url.to_string(),
    };
    if resolved.trim().is_empty() {
        return Err(DomainError::InvalidUrl("URL is required".to_string()));
    }
    Url::parse(&resolved).map_err(|e| DomainError::InvalidUrl(format!("{e}: {resolved}")))?;
    Ok(resolved)
}
