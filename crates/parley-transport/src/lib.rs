//! Realtime connection layer for Parley.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! how the client reaches the realtime presence server. The session layer
//! only ever sees these traits, so tests can swap in an in-memory
//! connection and production uses WebSocket.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket client via `tokio-tungstenite`

use std::fmt;
use std::future::Future;

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outgoing connections to the realtime server.
///
/// The returned futures are `Send` so a connection can be opened from
/// inside a spawned Tokio task.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Opens a new connection, attaching `query` as URL query parameters
    /// (for example `[("userId", "u1")]`).
    fn connect(
        &self,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single connection the server pushes frames over.
///
/// Presence is receive-only: the client never writes frames, it only
/// reads them and eventually closes the connection.
pub trait Connection: Send + Sync + 'static {
    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_equality() {
        assert_eq!(ConnectionId::new(1), ConnectionId::new(1));
        assert_ne!(ConnectionId::new(1), ConnectionId::new(2));
    }

    #[test]
    fn test_transport_error_display_includes_cause() {
        let err = TransportError::InvalidUrl("ftp://nope".into());
        assert_eq!(err.to_string(), "invalid endpoint url: ftp://nope");
    }
}
