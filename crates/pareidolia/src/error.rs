//! Unified error type for the Pareidolia client.

use pareidolia_guard::GuardError;
use pareidolia_model::ModelError;
use pareidolia_session::{SessionError, StorageError};
use pareidolia_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pareidolia` facade, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impl, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PareidoliaError {
    /// A request failed: rejected by the backend, or never answered.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The HTTP client couldn't be built.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body couldn't be encoded or decoded.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Credential storage couldn't be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Navigation failed.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Configuration couldn't be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend accepted the credentials but sent no usable token.
    #[error("login succeeded but no session token was issued")]
    MissingToken,
}

impl PareidoliaError {
    /// `true` when the backend answered 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Session(e) if e.is_unauthorized())
    }

    /// The text a notification should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Errors from loading [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable held a value of the wrong type.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
