//! # Parley
//!
//! Client-side session and presence layer for the Parley chat app.
//!
//! Parley keeps track of who is signed in: it restores a persisted session
//! at startup, logs users in and out against the auth backend, forwards
//! profile edits, and holds one realtime connection per signed-in user so
//! the UI always knows who else is online. Outcomes the user should see
//! arrive as [`Notification`]s on a channel the UI drains.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::prelude::*;
//!
//! # async fn run() -> Result<(), ParleyError> {
//! parley::telemetry::init_tracing();
//!
//! let config = ClientConfig::from_env()?;
//! let (mut client, mut notifications) = ClientBuilder::from_config(config).build()?;
//!
//! if client.restore_session().await.is_none() {
//!     let credentials = serde_json::json!({"email": "ada@example.com", "password": "..."});
//!     client.login(AuthMode::Login, &credentials).await?;
//! }
//!
//! println!("online: {:?}", client.online_users());
//! client.logout().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate              | Layer                                        |
//! |--------------------|----------------------------------------------|
//! | `parley-transport` | realtime connection traits, WebSocket client |
//! | `parley-protocol`  | wire types, event envelopes, codecs          |
//! | `parley-session`   | session manager, token storage, presence     |
//! | `parley`           | config, telemetry, unified error, builder    |

mod client;
mod config;
mod error;
pub mod telemetry;

pub use client::{Client, ClientBuilder};
pub use config::{
    BACKEND_URL_VAR, ClientConfig, DEFAULT_BACKEND_URL, LOGOUT_NOTIFY_VAR,
    TOKEN_DIR_VAR,
};
pub use error::ParleyError;

pub use parley_protocol::{
    AuthMode, OnlineUsers, RealtimeEvent, Token, User, UserId,
};
pub use parley_session::{
    AuthApi, FileTokenStore, HttpAuthApi, Level, LoginOutcome,
    MemoryTokenStore, Notification, NotificationReceiver, Notifier,
    PresenceSubscription, SessionConfig, SessionError, SessionManager,
    SessionState, TokenStore,
};
pub use parley_transport::{Connection, Connector, WebSocketConnector};

/// Everything an application usually needs, in one import.
pub mod prelude {
    pub use crate::{
        AuthMode, Client, ClientBuilder, ClientConfig, Level, LoginOutcome,
        Notification, NotificationReceiver, ParleyError, SessionConfig,
        SessionState, User, UserId,
    };
}
