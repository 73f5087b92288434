//! Error types for the protocol layer.
//!
//! Each crate in Parley defines its own error enum. A `ProtocolError`
//! means the bytes arrived but did not mean what we expected: malformed
//! JSON, a missing field, or a body that contradicts itself.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes or JSON).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: malformed JSON, wrong field types, or an event
    /// name this client does not know.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but violates the protocol.
    ///
    /// For example a login reply with `success: true` but no token.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
