//! The auth backend seam.
//!
//! The session manager never builds HTTP requests itself. It calls an
//! [`AuthApi`], passing the token it currently holds so the implementation
//! can sign the request. [`HttpAuthApi`](crate::HttpAuthApi) is the real
//! implementation; tests script their own.

use std::future::Future;

use parley_protocol::{
    AuthMode, CheckAuthResponse, LoginResponse, MessageResponse,
    ProfileResponse, Token,
};
use serde_json::Value;

use crate::SessionError;

/// The backend calls the session manager depends on.
///
/// Every method receives the current session token (if any) and must
/// attach it to the request. A logical failure (`success: false`) is an
/// `Ok` body; `Err` is reserved for transport and decoding failures.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` so the API client can live inside a
///   long-lived manager that may be moved across tasks.
/// - The returned futures are `Send`, so callers can drive manager
///   operations from a spawned task.
pub trait AuthApi: Send + Sync + 'static {
    /// `GET /api/auth/check`: is the token valid, and whose is it?
    fn check_auth(
        &self,
        token: Option<&Token>,
    ) -> impl Future<Output = Result<CheckAuthResponse, SessionError>> + Send;

    /// `POST /api/auth/{mode}` with the credentials object as the body.
    fn login(
        &self,
        token: Option<&Token>,
        mode: &AuthMode,
        credentials: &Value,
    ) -> impl Future<Output = Result<LoginResponse, SessionError>> + Send;

    /// `PUT /api/auth/update-profile` with the partial fields as the body.
    fn update_profile(
        &self,
        token: Option<&Token>,
        fields: &Value,
    ) -> impl Future<Output = Result<ProfileResponse, SessionError>> + Send;

    /// `POST /api/auth/logout`. Only called when
    /// [`SessionConfig::notify_backend_on_logout`](crate::SessionConfig)
    /// is set. The default does nothing, for backends without the route.
    fn logout(
        &self,
        token: Option<&Token>,
    ) -> impl Future<Output = Result<MessageResponse, SessionError>> + Send {
        let _ = token;
        async { Ok(MessageResponse::default()) }
    }
}
