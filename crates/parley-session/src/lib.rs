//! Client session management for Parley.
//!
//! This crate handles everything about "who is signed in" on the client:
//!
//! 1. **Authentication**: login, logout, and session restore against the
//!    auth backend ([`AuthApi`], [`HttpAuthApi`])
//! 2. **Persistence**: keeping the session token across restarts
//!    ([`TokenStore`])
//! 3. **Presence**: one realtime connection per signed-in user that keeps
//!    the online roster current ([`PresenceSubscription`])
//! 4. **Feedback**: user-visible success/error messages ([`Notifier`])
//!
//! [`SessionManager`] ties them together.
//!
//! # How it fits in the stack
//!
//! ```text
//! UI / facade (above)  ← calls login/logout/update_profile, reads state
//!     ↕
//! Session Layer (this crate)  ← owns token, user, roster, connection
//!     ↕
//! Protocol + Transport (below)  ← bodies, events, WebSocket connection
//! ```
//!
//! # Feature Flags
//!
//! - `http` (default): [`HttpAuthApi`] via `reqwest`

mod api;
mod error;
#[cfg(feature = "http")]
mod http;
mod manager;
mod notify;
mod presence;
mod session;
mod store;

pub use api::AuthApi;
pub use error::SessionError;
#[cfg(feature = "http")]
pub use http::{HttpAuthApi, RequestSigner};
pub use manager::{LoginOutcome, SessionManager};
pub use notify::{Level, Notification, NotificationReceiver, Notifier};
pub use presence::PresenceSubscription;
pub use session::{SessionConfig, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
