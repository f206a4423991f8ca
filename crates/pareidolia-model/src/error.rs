//! Error types for the model layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ModelError`, the problem is in the shape of the data, not in the
//! network or the session.

/// Errors that can occur while encoding, decoding, or parsing wire values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: a response body that isn't JSON, missing required
    /// fields, or a `referenceType` that isn't one of the three roles.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A role discriminant string wasn't `CONSUMER`, `PROMOTER`, or `ADMIN`.
    #[error("unknown role discriminant: {0:?}")]
    UnknownRole(String),
}
