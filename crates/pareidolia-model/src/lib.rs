//! Wire model for the Pareidolia API.
//!
//! This crate defines the "vocabulary" the client and the backend share:
//!
//! - **Identities** ([`Identity`], [`Role`], [`Account`], [`Promoter`]) —
//!   who is logged in, discriminated by the `referenceType` field.
//! - **DTOs** ([`EventDto`], [`BookingDto`], [`ReviewDto`], [`Page`], etc.) —
//!   the bodies of requests and responses.
//! - **Errors** ([`ErrorResponse`], [`ModelError`]) — the normalized error
//!   payload every failed call returns, and what can go wrong while
//!   encoding/decoding.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how bodies turn into bytes.
//!
//! # Architecture
//!
//! The model layer knows nothing about HTTP or sessions. It only knows how
//! the backend spells its data.
//!
//! ```text
//! Transport (bytes) → Model (DTOs) → Session / API clients
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod identity;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ModelError;
pub use identity::{Account, AccountLogin, Identity, Promoter, Role};
pub use types::{
    BookingDto, ErrorResponse, EventDto, EventState, EventUpdateDto,
    LoginDto, MessageDto, Page, PageRequest, PasswordUpdateDto,
    RegistrationDto, ReviewDto,
};
