//! Startup wiring.
//!
//! Builds the shared API client, points it at the configured server,
//! restores the session and installs the request augmentation hook on both
//! interceptor chains.

use std::sync::Arc;

use thiserror::Error;
use wiki_application::{
    ApiClient, ClientDefaults, DiagnosticSink, HttpClient, HttpClientError, LocalSession,
    RequestAugmentation, RequestInterceptor, ResponseInterceptor,
};
use wiki_domain::LocalUser;
use wiki_infrastructure::{ReqwestHttpClient, SessionError, SessionRepository, TracingSink};

use crate::config::AppConfig;

/// Errors that stop the client from starting.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The HTTP transport could not be created.
    #[error("failed to create HTTP transport: {0}")]
    Transport(#[from] HttpClientError),

    /// The persisted session could not be read.
    #[error("failed to restore session: {0}")]
    Session(#[from] SessionError),
}

/// A started client and the session it reads its token from.
#[derive(Debug)]
pub struct App<C: HttpClient> {
    /// Shared client; every caller goes through it
    pub client: Arc<ApiClient<C>>,
    /// Session whose token is attached to outgoing requests
    pub session: LocalSession,
    repository: SessionRepository,
}

impl<C: HttpClient> App<C> {
    /// Stores `user` as the logged-in user and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written; the in-memory
    /// session is updated regardless.
    pub async fn login(&self, user: LocalUser) -> Result<(), SessionError> {
        self.session.set_local_user(user.clone());
        self.repository.save(&user).await
    }

    /// Forgets the logged-in user and deletes the persisted copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.session.clear();
        self.repository.clear().await
    }
}

/// Starts the client with the reqwest transport and `tracing` diagnostics.
///
/// # Errors
///
/// See [`BootstrapError`].
pub async fn bootstrap(config: &AppConfig) -> Result<App<ReqwestHttpClient>, BootstrapError> {
    let transport = Arc::new(ReqwestHttpClient::new()?);
    bootstrap_with(config, transport, Arc::new(TracingSink::new())).await
}

/// Starts the client with the given transport and diagnostic sink.
///
/// # Errors
///
/// See [`BootstrapError`].
pub async fn bootstrap_with<C: HttpClient>(
    config: &AppConfig,
    transport: Arc<C>,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<App<C>, BootstrapError> {
    tracing::info!(profile = %config.profile, server = %config.server, "Environment");

    let repository = config
        .session_file
        .clone()
        .map_or_else(SessionRepository::new, SessionRepository::at);
    let session = restore_session(config, &repository).await?;

    let defaults = ClientDefaults {
        base_url: Some(config.server.clone()),
        timeout_ms: config.timeout_ms,
        ..ClientDefaults::default()
    };
    let mut client = ApiClient::with_defaults(transport, defaults);

    let hook = Arc::new(
        RequestAugmentation::new(Arc::new(session.clone()), sink)
            .with_token_logging(config.token_logging),
    );
    client.intercept_requests(Arc::clone(&hook) as Arc<dyn RequestInterceptor>);
    client.intercept_responses(hook as Arc<dyn ResponseInterceptor>);

    Ok(App {
        client: Arc::new(client),
        session,
        repository,
    })
}

async fn restore_session(
    config: &AppConfig,
    repository: &SessionRepository,
) -> Result<LocalSession, SessionError> {
    if let Some(token) = &config.token {
        tracing::debug!("using token from configuration");
        return Ok(LocalSession::with_user(LocalUser {
            token: Some(token.clone()),
            ..LocalUser::default()
        }));
    }

    match repository.load().await? {
        Some(user) => {
            tracing::debug!(login_name = %user.login_name, "restored persisted session");
            Ok(LocalSession::with_user(user))
        }
        None => Ok(LocalSession::new()),
    }
}
