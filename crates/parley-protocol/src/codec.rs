//! Codec trait and implementations for decoding realtime frames.
//!
//! A codec turns the raw bytes of a frame into a Rust type. The
//! presence task receives raw frames from the transport and hands
//! them to a codec; it never parses JSON itself. Swapping the codec is
//! how a different realtime framing would be supported.

use serde::de::DeserializeOwned;

use crate::ProtocolError;

/// Decodes frames pushed by the realtime server.
///
/// ## Trait bounds
///
/// - `Send + Sync` → safe to share with the spawned presence task.
/// - `'static` → the codec owns everything it needs, so it can live
///   inside long-running tasks.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
/// borrow from the input bytes, so the frame buffer can be dropped right
/// after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// The realtime server speaks JSON event envelopes, so this is the codec
/// the session layer uses by default.
///
/// ## Example
///
/// ```rust
/// use parley_protocol::{Codec, JsonCodec, RealtimeEvent, UserId};
///
/// let codec = JsonCodec;
/// let event: RealtimeEvent = codec
///     .decode(br#"{"event":"getOnlineUsers","data":["u2","u3"]}"#)
///     .unwrap();
///
/// assert_eq!(
///     event,
///     RealtimeEvent::GetOnlineUsers(vec![UserId::from("u2"), UserId::from("u3")])
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
