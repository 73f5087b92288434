//! Error types for the session layer.

use parley_protocol::ProtocolError;

/// Errors that can occur while managing the client session.
///
/// Most of these never reach the caller: the
/// [`SessionManager`](crate::SessionManager) turns them into notifications.
/// `login` is the one operation that hands them back after notifying.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The HTTP call to the auth backend failed: network error, timeout,
    /// or a non-2xx status.
    #[error("{0}")]
    Http(String),

    /// The backend replied, but the body was not what the protocol
    /// promises (undecodable JSON, success without a token, ...).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Reading or writing the persisted token failed.
    #[error("token storage failed: {0}")]
    Storage(#[source] std::io::Error),
}
