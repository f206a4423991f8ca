/// Errors that can occur in the transport layer.
///
/// Every variant means "no usable response arrived". A response with an
/// error status is not a transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header, bad MIME type).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connecting or sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The request took longer than the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response arrived but its body could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}
