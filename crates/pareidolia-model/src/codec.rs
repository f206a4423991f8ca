//! Codec trait and implementations for request and response bodies.
//!
//! A "codec" (coder/decoder) converts between Rust values and raw bytes.
//! The transport layer moves bytes; the API clients speak DTOs. The codec
//! sits between them so that neither side cares how the other is spelled.
//!
//! Currently we provide [`JsonCodec`], which is what the backend speaks.

use serde::{Serialize, de::DeserializeOwned};

use crate::ModelError;

/// A codec that can encode Rust values to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → the codec lives inside shared client handles that
///   Tokio may poll from any worker thread.
/// - `'static` → it owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` header value for bodies produced by this codec.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ModelError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ModelError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ModelError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ModelError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use pareidolia_model::{Codec, Identity, JsonCodec, Role};
///
/// let codec = JsonCodec;
/// let body = br#"{"id":1,"email":"a@b.com","name":"Ada","surname":"L",
///                 "phone":"1","referenceType":"ADMIN"}"#;
///
/// let identity: Identity = codec.decode(body).unwrap();
/// assert_eq!(identity.role(), Role::Admin);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec(value).map_err(ModelError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ModelError> {
        serde_json::from_slice(data).map_err(ModelError::Decode)
    }
}
