//! `Client` builder: wires the production collaborators together.
//!
//! The session layer is generic over its collaborators. Applications
//! almost always want the same set (HTTP backend, token file, WebSocket
//! presence), so the facade names that combination [`Client`] and builds
//! it from a [`ClientConfig`].

use std::path::PathBuf;

use parley_session::{
    FileTokenStore, HttpAuthApi, NotificationReceiver, Notifier,
    SessionConfig, SessionManager,
};
use parley_transport::WebSocketConnector;

use crate::config::parse_backend_url;
use crate::{ClientConfig, ParleyError};

/// A session manager talking to a real backend.
pub type Client = SessionManager<HttpAuthApi, FileTokenStore, WebSocketConnector>;

/// Builder for configuring a [`Client`].
///
/// # Example
///
/// ```rust,no_run
/// use parley::prelude::*;
///
/// # async fn run() -> Result<(), ParleyError> {
/// let (mut client, mut notifications) = ClientBuilder::new()
///     .backend_url("http://localhost:5000")
///     .build()?;
///
/// client.restore_session().await;
/// while let Ok(note) = notifications.try_recv() {
///     println!("{:?}: {}", note.level, note.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a builder with [`ClientConfig::default`] settings.
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    /// Creates a builder starting from an existing configuration,
    /// typically [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Sets the auth backend base URL.
    pub fn backend_url(mut self, url: &str) -> Self {
        self.config.backend_url = url.to_string();
        self
    }

    /// Sets the directory the session token is persisted in.
    pub fn token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.token_dir = Some(dir.into());
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Builds the client and the receiver its notifications arrive on.
    ///
    /// Nothing touches the network yet; call
    /// [`restore_session`](SessionManager::restore_session) next.
    ///
    /// # Errors
    /// [`ParleyError::Config`] for an unusable backend URL or when no token
    /// directory is known.
    pub fn build(self) -> Result<(Client, NotificationReceiver), ParleyError> {
        let backend_url = parse_backend_url(&self.config.backend_url)?;
        let token_dir = self.config.token_dir.ok_or_else(|| {
            ParleyError::Config(
                "no data directory on this platform; set PARLEY_TOKEN_DIR".into(),
            )
        })?;

        let api = HttpAuthApi::new(&backend_url);
        let connector = WebSocketConnector::new(&backend_url)?;
        let store = FileTokenStore::in_dir(&token_dir);
        let (notifier, notifications) = Notifier::channel();

        tracing::info!(
            %backend_url,
            realtime = %connector.endpoint(),
            token_dir = %token_dir.display(),
            "parley client configured"
        );

        let client = SessionManager::new(
            api,
            store,
            connector,
            notifier,
            self.config.session,
        );
        Ok((client, notifications))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
