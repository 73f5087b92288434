//! Client configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file:
//!
//! | Variable               | Field                              | Default                  |
//! |------------------------|------------------------------------|--------------------------|
//! | `PARLEY_BACKEND_URL`   | `backend_url`                      | `http://localhost:5000`  |
//! | `PARLEY_TOKEN_DIR`     | `token_dir`                        | `<data dir>/parley`      |
//! | `PARLEY_LOGOUT_NOTIFY` | `session.notify_backend_on_logout` | `false`                  |

use std::path::PathBuf;

use parley_session::{FileTokenStore, SessionConfig};
use url::Url;

use crate::ParleyError;

pub const BACKEND_URL_VAR: &str = "PARLEY_BACKEND_URL";
pub const TOKEN_DIR_VAR: &str = "PARLEY_TOKEN_DIR";
pub const LOGOUT_NOTIFY_VAR: &str = "PARLEY_LOGOUT_NOTIFY";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Everything needed to build a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth backend, without a trailing slash. The
    /// realtime endpoint is derived from it by swapping the scheme.
    pub backend_url: String,
    /// Directory holding the persisted token. `None` when the platform has
    /// no data directory and nothing was configured.
    pub token_dir: Option<PathBuf>,
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            token_dir: FileTokenStore::default_dir(),
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Loads `.env` if present, then reads the `PARLEY_*` variables.
    ///
    /// # Errors
    /// Returns [`ParleyError::Config`] when `PARLEY_BACKEND_URL` is not an
    /// absolute `http(s)` URL.
    pub fn from_env() -> Result<Self, ParleyError> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ParleyError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(BACKEND_URL_VAR) {
            config.backend_url = parse_backend_url(&raw)?;
        }
        if let Some(dir) = lookup(TOKEN_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config.token_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = lookup(LOGOUT_NOTIFY_VAR) {
            config.session.notify_backend_on_logout = parse_flag(&flag);
        }

        tracing::debug!(
            backend_url = %config.backend_url,
            token_dir = ?config.token_dir,
            notify_backend_on_logout = config.session.notify_backend_on_logout,
            "client configuration loaded"
        );
        Ok(config)
    }
}

/// Checks a backend base URL and normalizes it (no trailing slash).
pub(crate) fn parse_backend_url(raw: &str) -> Result<String, ParleyError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ParleyError::Config(format!("backend URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => {
            Ok(url.as_str().trim_end_matches('/').to_string())
        }
        other => Err(ParleyError::Config(format!(
            "backend URL: unsupported scheme '{other}'"
        ))),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
