//! Application configuration.
//!
//! Values come from built-in defaults overridden by `WIKI_*` environment
//! variables. The default server is captured from `WIKI_SERVER` at build
//! time, so a release binary talks to the backend it was built for unless
//! told otherwise at runtime.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use wiki_application::TokenLogging;
use wiki_domain::request::resolve_url;

/// Backend used when nothing else is configured.
pub const DEFAULT_SERVER: &str = match option_env!("WIKI_SERVER") {
    Some(server) => server,
    None => "http://127.0.0.1:8880",
};

/// Prefix of the environment variables read at startup.
pub const ENV_PREFIX: &str = "WIKI";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// The server value is not an absolute URL.
    #[error("invalid server URL {url:?}: {reason}")]
    InvalidServer {
        /// Configured value
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Base URL prefixed to every relative request path
    pub server: String,
    /// Deployment profile, logged at startup
    pub profile: String,
    /// Whether token values may appear in logs
    pub token_logging: TokenLogging,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log: String,
    /// Where the logged-in user is persisted; platform default when unset
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// Token used for this run instead of the persisted session
    #[serde(default)]
    pub token: Option<String>,
    /// Default request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has the wrong type or the server URL
    /// is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from defaults overridden by `source`.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .set_default("server", DEFAULT_SERVER)?
            .set_default("profile", "development")?
            .set_default("token_logging", "redacted")?
            .set_default("log", "info")?
            .add_source(source)
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        resolve_url(None, &self.server)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidServer {
                url: self.server.clone(),
                reason: e.to_string(),
            })
    }
}
