//! Session types: configuration and the observable session state.
//!
//! The client holds at most one session. It is either anonymous, or it
//! belongs to a user and (usually) has a live presence connection.

use parley_protocol::UserId;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
///
/// `#[derive(Clone)]` because the facade keeps a copy in its
/// `ClientConfig` and hands another to the `SessionManager`.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Whether `logout` should call `POST /api/auth/logout` before
    /// clearing local state.
    ///
    /// Default: `false`. Local logout never depends on this call; a
    /// failure is reported and the local state is cleared anyway.
    pub notify_backend_on_logout: bool,
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current state of the client session.
///
/// ```text
///   Anonymous ──(restore ok | login ok)──→ Authenticated { connected: true }
///       ↑                                          │
///       └──────────────(logout)────────────────────┘
/// ```
///
/// `connected` can drop to `false` while authenticated if the server
/// closes the presence connection; nothing reconnects it automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No user is signed in.
    Anonymous,

    /// A user is signed in.
    Authenticated {
        /// Who is signed in.
        user_id: UserId,
        /// Whether the presence connection is live.
        connected: bool,
    },
}

impl SessionState {
    /// Returns `true` if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}
