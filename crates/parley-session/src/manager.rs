//! The session manager: owns the client's authentication state.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Restoring a persisted session at startup
//! - Logging in and out, persisting the token
//! - Proxying profile edits
//! - Holding the single presence connection while someone is signed in
//!
//! # Concurrency note
//!
//! Every operation takes `&mut self`, so operations never overlap: the
//! UI awaits one before starting the next. The only concurrent activity is
//! the presence task, which shares nothing with the manager except the
//! `watch` channel carrying the online roster.

use std::sync::Arc;

use parley_protocol::{
    AuthMode, Codec, JsonCodec, OnlineUsers, ProtocolError, Token, User,
    UserId,
};
use parley_transport::Connector;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    AuthApi, Notifier, PresenceSubscription, SessionConfig, SessionError,
    SessionState, TokenStore,
};

/// Success text when the backend's login reply carries no message.
const LOGIN_SUCCESS_FALLBACK: &str = "Logged in successfully";
/// Error text when the backend rejects a login without a message.
const LOGIN_REJECTED_FALLBACK: &str = "Authentication failed";
const LOGOUT_SUCCESS: &str = "Logged out successfully";
const PROFILE_SUCCESS: &str = "Profile updated successfully";
/// Error text when the backend rejects a profile update without a message.
const PROFILE_REJECTED_FALLBACK: &str = "Profile update failed";
/// Error text when the backend rejects a stored token without a message.
const SESSION_REJECTED_FALLBACK: &str = "Session expired, please log in again";

/// What a [`SessionManager::login`] call achieved.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The backend accepted the credentials; this user is now signed in.
    Authenticated(User),
    /// The backend answered `success: false`. Session state is untouched.
    Rejected {
        /// The server's message (or a generic fallback).
        message: String,
    },
}

/// Owns the token, the current user, the online roster, and the presence
/// connection.
///
/// The manager is generic over its collaborators so each one can be
/// swapped independently:
///
/// - `A`: the auth backend ([`AuthApi`])
/// - `S`: durable token storage ([`TokenStore`])
/// - `C`: how the presence connection is opened ([`Connector`])
/// - `K`: how presence frames are decoded ([`Codec`], JSON by default)
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ restore_session() ──→ [Anonymous | Authenticated]
///                                      │             │
///                              login() │             │ logout()
///                                      ▼             ▼
///                               [Authenticated]  [Anonymous]
///
/// shutdown() / drop ──→ presence connection released
/// ```
pub struct SessionManager<A, S, C, K = JsonCodec> {
    api: A,
    store: S,
    connector: C,
    codec: K,
    notifier: Notifier,
    config: SessionConfig,

    /// The token every request is signed with.
    token: Option<Token>,
    user: Option<User>,
    /// `true` until the first `restore_session` finishes.
    loading: bool,
    /// Present only while `user` is present.
    presence: Option<PresenceSubscription>,
    /// Latest roster pushed by the realtime server. Shared with the
    /// presence task, which is the only writer while connected.
    online: Arc<watch::Sender<OnlineUsers>>,
}

impl<A, S, C> SessionManager<A, S, C, JsonCodec>
where
    A: AuthApi,
    S: TokenStore,
    C: Connector,
{
    /// Creates an empty session manager that decodes presence frames as
    /// JSON.
    ///
    /// Nothing is read or sent until
    /// [`restore_session`](Self::restore_session) is called.
    pub fn new(
        api: A,
        store: S,
        connector: C,
        notifier: Notifier,
        config: SessionConfig,
    ) -> Self {
        Self::with_codec(api, store, connector, JsonCodec, notifier, config)
    }
}

impl<A, S, C, K> SessionManager<A, S, C, K>
where
    A: AuthApi,
    S: TokenStore,
    C: Connector,
    K: Codec + Clone,
{
    /// Creates an empty session manager with a custom presence codec.
    pub fn with_codec(
        api: A,
        store: S,
        connector: C,
        codec: K,
        notifier: Notifier,
        config: SessionConfig,
    ) -> Self {
        let (online, _) = watch::channel(OnlineUsers::new());
        Self {
            api,
            store,
            connector,
            codec,
            notifier,
            config,
            token: None,
            user: None,
            loading: true,
            presence: None,
            online: Arc::new(online),
        }
    }

    // =====================================================================
    // Operations
    // =====================================================================

    /// Restores a previous session at startup.
    ///
    /// Loads the persisted token and asks the backend who it belongs to.
    /// The check is sent even when nothing is stored (unsigned), so the
    /// backend decides. On success the user is set and the presence
    /// connection opened; on any failure the session stays anonymous and
    /// the error is reported through the notifier. The one exception is
    /// a rejection of the unsigned check: with no token there was no
    /// session to lose, so that is only logged.
    ///
    /// `is_loading()` is `false` when this returns, whatever happened.
    pub async fn restore_session(&mut self) -> Option<&User> {
        match self.store.load() {
            Ok(Some(token)) => self.token = Some(token),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored token");
                self.notifier.error(e.to_string());
            }
        }

        match self.api.check_auth(self.token.as_ref()).await {
            Ok(body) if body.success => match body.user {
                Some(user) => {
                    tracing::info!(user_id = %user.id, "session restored");
                    self.set_user(user).await;
                }
                None => {
                    tracing::warn!("session check succeeded without a user");
                }
            },
            Ok(body) if self.token.is_some() => {
                tracing::info!(
                    reason = body.message.as_deref().unwrap_or_default(),
                    "stored session rejected"
                );
                self.notifier.error(
                    body.message
                        .unwrap_or_else(|| SESSION_REJECTED_FALLBACK.to_string()),
                );
            }
            Ok(body) => {
                tracing::debug!(
                    reason = body.message.as_deref().unwrap_or_default(),
                    "no stored session to restore"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "session check failed");
                self.notifier.error(e.to_string());
            }
        }

        self.loading = false;
        self.user.as_ref()
    }

    /// Signs in (or signs up, depending on `mode`) with `credentials`.
    ///
    /// On success the user is set, the presence connection opened, and
    /// the token persisted and used to sign every later request.
    ///
    /// # Errors
    /// Transport failures and malformed replies are notified *and*
    /// returned, so a form can stay open. A rejection (`success: false`)
    /// is not an error: it is notified and returned as
    /// [`LoginOutcome::Rejected`].
    pub async fn login<T>(
        &mut self,
        mode: AuthMode,
        credentials: &T,
    ) -> Result<LoginOutcome, SessionError>
    where
        T: Serialize + ?Sized,
    {
        let credentials = match serde_json::to_value(credentials) {
            Ok(value) => value,
            Err(e) => {
                return Err(self.report(ProtocolError::Encode(e).into()));
            }
        };

        let body = match self
            .api
            .login(self.token.as_ref(), &mode, &credentials)
            .await
        {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%mode, error = %e, "login request failed");
                return Err(self.report(e));
            }
        };

        if !body.success {
            let message = body
                .message
                .unwrap_or_else(|| LOGIN_REJECTED_FALLBACK.to_string());
            tracing::info!(%mode, "login rejected by backend");
            self.notifier.error(message.clone());
            return Ok(LoginOutcome::Rejected { message });
        }

        let (Some(user), Some(token)) = (body.user_data, body.token) else {
            let e = ProtocolError::InvalidMessage(
                "login succeeded without userData or token".into(),
            );
            return Err(self.report(e.into()));
        };

        tracing::info!(%mode, user_id = %user.id, "logged in");
        self.set_user(user.clone()).await;
        if let Err(e) = self.store.save(&token) {
            // The session still works for this run; only persistence failed.
            tracing::warn!(error = %e, "could not persist token");
            self.notifier.error(e.to_string());
        }
        self.token = Some(token);

        self.notifier.success(
            body.message
                .unwrap_or_else(|| LOGIN_SUCCESS_FALLBACK.to_string()),
        );
        Ok(LoginOutcome::Authenticated(user))
    }

    /// Signs out locally.
    ///
    /// Closes the presence connection, forgets the user, the roster and
    /// the token (in memory and in storage), and stops signing requests.
    /// Never fails: cleanup problems are reported as they happen, the
    /// local state is cleared regardless, and the success notification
    /// always follows the local clear.
    pub async fn logout(&mut self) {
        if self.config.notify_backend_on_logout {
            if let Err(e) = self.api.logout(self.token.as_ref()).await {
                tracing::warn!(error = %e, "backend logout failed");
                self.notifier.error(e.to_string());
            }
        }

        if let Some(presence) = self.presence.take() {
            presence.cancel().await;
        }

        let user_id = self.user.take().map(|user| user.id);
        self.token = None;
        self.online.send_replace(OnlineUsers::new());

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not remove stored token");
            self.notifier.error(e.to_string());
        }

        tracing::info!(user_id = ?user_id, "logged out");
        self.notifier.success(LOGOUT_SUCCESS);
    }

    /// Sends a partial profile update for the signed-in user.
    ///
    /// Returns the updated user on success. Failures of any kind are
    /// reported through the notifier and leave the current user as it was;
    /// nothing is returned to the caller as an error.
    pub async fn update_profile<T>(&mut self, fields: &T) -> Option<&User>
    where
        T: Serialize + ?Sized,
    {
        let fields: Value = match serde_json::to_value(fields) {
            Ok(value) => value,
            Err(e) => {
                self.report(ProtocolError::Encode(e).into());
                return None;
            }
        };

        match self.api.update_profile(self.token.as_ref(), &fields).await {
            Ok(body) if body.success && body.user.is_some() => {
                self.user = body.user;
                self.notifier.success(PROFILE_SUCCESS);
                self.user.as_ref()
            }
            Ok(body) => {
                self.notifier.error(
                    body.message
                        .unwrap_or_else(|| PROFILE_REJECTED_FALLBACK.to_string()),
                );
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile update failed");
                self.report(e);
                None
            }
        }
    }

    /// Opens the presence connection for the signed-in user.
    ///
    /// Does nothing when nobody is signed in or a connection is already
    /// live. A connection the server has closed is not live and gets
    /// replaced. Open failures are logged, never returned or notified.
    pub async fn connect_realtime(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|user| user.id.clone())
        else {
            tracing::debug!("no signed-in user, not connecting presence");
            return;
        };

        if self.is_connected() {
            tracing::debug!(%user_id, "presence already connected");
            return;
        }

        match PresenceSubscription::open(
            &self.connector,
            self.codec.clone(),
            user_id.clone(),
            Arc::clone(&self.online),
        )
        .await
        {
            Ok(subscription) => self.presence = Some(subscription),
            Err(e) => {
                tracing::error!(%user_id, error = %e, "presence connection setup failed");
            }
        }
    }

    /// Tears the manager down, waiting for the presence connection to
    /// close. Dropping the manager also releases the connection, without
    /// waiting.
    pub async fn shutdown(mut self) {
        if let Some(presence) = self.presence.take() {
            presence.cancel().await;
        }
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The token the session holds, if any.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// The value the `token` header carries on outgoing requests, if any.
    pub fn signing_token(&self) -> Option<&str> {
        self.token.as_ref().map(Token::as_str)
    }

    /// `true` until the first `restore_session` completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// `true` while a presence connection is live.
    pub fn is_connected(&self) -> bool {
        self.presence
            .as_ref()
            .is_some_and(PresenceSubscription::is_live)
    }

    /// Snapshot of the session state.
    pub fn state(&self) -> SessionState {
        match &self.user {
            None => SessionState::Anonymous,
            Some(user) => SessionState::Authenticated {
                user_id: user.id.clone(),
                connected: self.is_connected(),
            },
        }
    }

    /// Snapshot of the users currently online.
    pub fn online_users(&self) -> OnlineUsers {
        self.online.borrow().clone()
    }

    /// Whether `user_id` is in the latest roster.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.online.borrow().contains(user_id)
    }

    /// A receiver that observes every roster change.
    pub fn watch_online_users(&self) -> watch::Receiver<OnlineUsers> {
        self.online.subscribe()
    }

    /// The notifier operations report through.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Sets the user and makes sure the presence connection belongs to
    /// them. A live connection opened for someone else is closed first.
    async fn set_user(&mut self, user: User) {
        if let Some(presence) = self.presence.take_if(|p| p.user_id() != &user.id) {
            tracing::debug!(
                previous = %presence.user_id(),
                "closing presence connection of previous user"
            );
            presence.cancel().await;
        }
        self.user = Some(user);
        self.connect_realtime().await;
    }

    /// Notifies the user of `error` and hands it back.
    fn report(&self, error: SessionError) -> SessionError {
        self.notifier.error(error.to_string());
        error
    }
}
