//! Error types for the session layer.

use pareidolia_model::{ErrorResponse, ModelError};
use pareidolia_transport::TransportError;

/// Errors returned by the session store, the gateway, and everything that
/// sends requests through them.
///
/// The interesting variant is [`Rejected`](Self::Rejected): the backend
/// answered with an error status and the gateway normalized the body.
/// Callers match on that single shape regardless of which endpoint failed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend answered with an error status.
    #[error("request rejected: {0}")]
    Rejected(ErrorResponse),

    /// No response arrived at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body couldn't be encoded, or a success body couldn't be decoded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The persisted credential pair couldn't be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// The HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected(response) => response.status,
            _ => None,
        }
    }

    /// `true` when the backend rejected the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The normalized payload, if the backend produced one.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Rejected(response) => Some(response),
            _ => None,
        }
    }

    /// The text a transient notification should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(response) => response.message.clone(),
            Self::Transport(_) => "The server could not be reached".to_string(),
            Self::Model(_) => "The server sent an unexpected response".to_string(),
            Self::Storage(_) => "Your session could not be saved".to_string(),
        }
    }
}

/// Errors from durable credential storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but isn't a JSON string map.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_exposes_status_and_payload() {
        let err = SessionError::Rejected(ErrorResponse::new(404, "Event not found"));

        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "Event not found");
        assert_eq!(err.error_response().unwrap().message, "Event not found");
    }

    #[test]
    fn test_is_unauthorized_only_for_401() {
        let err = SessionError::Rejected(ErrorResponse::new(401, "Unauthorized"));
        assert!(err.is_unauthorized());

        let err = SessionError::Transport(TransportError::Timeout);
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), None);
        assert!(err.error_response().is_none());
    }

    #[test]
    fn test_from_transport_error() {
        let err: SessionError = TransportError::SendFailed("refused".into()).into();
        assert!(matches!(err, SessionError::Transport(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_from_storage_error() {
        let err: SessionError = StorageError::Corrupt("not json".into()).into();
        assert!(matches!(err, SessionError::Storage(_)));
        assert_eq!(err.user_message(), "Your session could not be saved");
    }
}
