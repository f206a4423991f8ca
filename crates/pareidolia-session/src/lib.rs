//! Client-side session management for Pareidolia.
//!
//! This crate answers one question for the rest of the client: *who is
//! logged in right now?* It handles:
//!
//! 1. **Persistence** — the bearer token and role discriminant survive a
//!    restart ([`CredentialStore`], [`MemoryStorage`], [`FileStorage`])
//! 2. **Session state** — the published current identity, observable by
//!    any number of subscribers ([`SessionHandle`], [`SessionState`])
//! 3. **Startup resolution** — re-validating persisted credentials once,
//!    and telling everyone when that's done ([`InitSignal`])
//! 4. **Error normalization** — every failed request becomes an
//!    [`ErrorResponse`](pareidolia_model::ErrorResponse), and a 401 logs
//!    the session out ([`Gateway`])
//!
//! # How it fits in the stack
//!
//! ```text
//! API clients / guards (above)  ← read the session, send through the gateway
//!     ↕
//! Session layer (this crate)    ← owns credentials and the current identity
//!     ↕
//! Transport + model (below)     ← move bytes, define DTOs
//! ```

mod error;
mod gateway;
mod handle;
mod session;
mod signal;
mod storage;
mod store;

pub use error::{SessionError, StorageError};
pub use gateway::{Gateway, Navigator, normalize_error};
pub use handle::SessionHandle;
pub use session::{Credentials, SessionConfig, SessionState};
pub use signal::{InitSignal, SignalAbandoned};
pub use storage::{
    CredentialStore, FileStorage, MemoryStorage, ROLE_KEY, TOKEN_KEY,
};
pub use store::SessionStore;
