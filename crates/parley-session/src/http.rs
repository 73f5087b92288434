//! [`AuthApi`] over HTTP using `reqwest`.

use parley_protocol::{
    AuthMode, CHECK_AUTH_PATH, CheckAuthResponse, LOGOUT_PATH, LoginResponse,
    MessageResponse, ProfileResponse, ProtocolError, TOKEN_HEADER, Token,
    UPDATE_PROFILE_PATH,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{AuthApi, SessionError};

/// Attaches the session token to outgoing requests.
///
/// Signing is an explicit step on every call rather than a default header
/// mutated on a shared client, so a request can only carry the token the
/// caller passed in for that request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Adds the `token` header when a token is present.
    pub fn sign(
        &self,
        request: RequestBuilder,
        token: Option<&Token>,
    ) -> RequestBuilder {
        match token {
            Some(token) => request.header(TOKEN_HEADER, token.as_str()),
            None => request,
        }
    }
}

/// Talks to the auth backend over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    signer: RequestSigner,
}

impl HttpAuthApi {
    /// Creates an API client for the backend at `base_url`
    /// (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Like [`new`](Self::new), reusing an existing `reqwest::Client`
    /// (connection pool, proxy and TLS settings).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer: RequestSigner,
        }
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signs, sends, checks the status, and decodes the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&Token>,
    ) -> Result<T, SessionError> {
        let response = self
            .signer
            .sign(request, token)
            .send()
            .await
            .map_err(|e| SessionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url = %response.url(), "auth backend returned an error status");
            return Err(SessionError::Http(format!(
                "request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SessionError::Http(e.to_string()))?;
        serde_json::from_slice(&body)
            .map_err(|e| SessionError::Protocol(ProtocolError::Decode(e)))
    }
}

impl AuthApi for HttpAuthApi {
    async fn check_auth(
        &self,
        token: Option<&Token>,
    ) -> Result<CheckAuthResponse, SessionError> {
        let request = self.client.get(self.url(CHECK_AUTH_PATH));
        self.send(request, token).await
    }

    async fn login(
        &self,
        token: Option<&Token>,
        mode: &AuthMode,
        credentials: &Value,
    ) -> Result<LoginResponse, SessionError> {
        let request = self.client.post(self.url(&mode.path())).json(credentials);
        self.send(request, token).await
    }

    async fn update_profile(
        &self,
        token: Option<&Token>,
        fields: &Value,
    ) -> Result<ProfileResponse, SessionError> {
        let request = self.client.put(self.url(UPDATE_PROFILE_PATH)).json(fields);
        self.send(request, token).await
    }

    async fn logout(
        &self,
        token: Option<&Token>,
    ) -> Result<MessageResponse, SessionError> {
        let request = self.client.post(self.url(LOGOUT_PATH));
        self.send(request, token).await
    }
}
