//! Core protocol types for Parley's wire format.
//!
//! Everything in this module crosses a process boundary: HTTP response
//! bodies from the auth backend, and event envelopes pushed over the
//! realtime connection. Field names follow the backend's JSON exactly
//! (`_id`, `userData`, `getOnlineUsers`), renamed into Rust style with
//! serde attributes.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Paths and header names
// ---------------------------------------------------------------------------

/// Name of the header that carries the session token on signed requests.
pub const TOKEN_HEADER: &str = "token";

/// Query field that identifies the user on the realtime connection.
pub const USER_ID_QUERY: &str = "userId";

/// `GET`: validates the signing token and returns the current user.
pub const CHECK_AUTH_PATH: &str = "/api/auth/check";

/// `PUT`: partial profile update for the signed-in user.
pub const UPDATE_PROFILE_PATH: &str = "/api/auth/update-profile";

/// `POST`: server-side logout. Only called when explicitly enabled.
pub const LOGOUT_PATH: &str = "/api/auth/logout";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The backend's identifier for a user (the `_id` field).
///
/// A newtype so a user id can't be confused with a token or any other
/// string. `#[serde(transparent)]` keeps it a plain JSON string on the
/// wire: `UserId("u1")` is just `"u1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The set of users currently online, as last pushed by the server.
pub type OnlineUsers = HashSet<UserId>;

/// An opaque session token issued by the backend on login.
///
/// `Debug` is implemented by hand and never prints the value, so a token
/// that ends up inside a logged struct stays secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token, for signing requests or persisting it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns the raw string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// User record
// ---------------------------------------------------------------------------

/// A user record as returned by the backend.
///
/// Only `_id` is interpreted by the client. Every other field (name,
/// avatar, bio, ...) is kept in `profile` exactly as received, and
/// `#[serde(flatten)]` writes it back at the top level on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's identifier, used to open the realtime connection.
    #[serde(rename = "_id")]
    pub id: UserId,

    /// All remaining fields, uninterpreted.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    /// Creates a user with the given id and no profile fields.
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            profile: Map::new(),
        }
    }

    /// Looks up a profile field by its JSON name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.profile.get(name)
    }
}

// ---------------------------------------------------------------------------
// Auth modes
// ---------------------------------------------------------------------------

/// Which `POST /api/auth/{mode}` sub-route a login attempt targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Sign in to an existing account (`/api/auth/login`).
    Login,
    /// Create a new account and sign in (`/api/auth/signup`).
    Signup,
    /// Any other sub-route the backend exposes.
    Custom(String),
}

impl AuthMode {
    /// The route segment after `/api/auth/`.
    pub fn route(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Custom(route) => route,
        }
    }

    /// The full request path, e.g. `/api/auth/login`.
    pub fn path(&self) -> String {
        format!("/api/auth/{}", self.route())
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------
//
// Every backend reply carries a `success` flag. A body without one is
// treated as `success: false` rather than a decode error, so a bare
// `{}` is a logical failure and not a transport failure.

/// Body of `GET /api/auth/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /api/auth/{mode}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(
        rename = "userData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_data: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `PUT /api/auth/update-profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of replies the client only inspects for a message (logout).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Realtime events
// ---------------------------------------------------------------------------

/// An event pushed by the realtime server.
///
/// `#[serde(tag = "event", content = "data")]` is serde's "adjacently
/// tagged" representation, matching the server's envelope:
///
/// ```text
/// {"event": "getOnlineUsers", "data": ["u2", "u3"]}
/// {"event": "connect_error",  "data": {"message": "xhr poll error"}}
/// ```
///
/// Unknown event names fail to decode; the presence task logs and skips
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RealtimeEvent {
    /// The full roster of online user ids. Replaces any previous roster.
    #[serde(rename = "getOnlineUsers")]
    GetOnlineUsers(Vec<UserId>),

    /// The server reports a connection problem.
    #[serde(rename = "connect_error")]
    ConnectError(ErrorDetail),
}

/// The payload of a `connect_error` event.
///
/// Servers send either a bare string or an object with a `message`
/// field. `#[serde(untagged)]` tries each shape in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Object { message: String },
}

impl ErrorDetail {
    /// The human-readable error text, whichever shape it arrived in.
    pub fn message(&self) -> &str {
        match self {
            Self::Text(message) | Self::Object { message } => message,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
