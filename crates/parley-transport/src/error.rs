/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint URL could not be parsed or has an unsupported scheme.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),

    /// Opening the connection failed (DNS, TCP, or upgrade handshake).
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Sending the close handshake failed.
    #[error("close failed: {0}")]
    CloseFailed(#[source] std::io::Error),
}
