//! Role-scoped API clients for the Pareidolia backend.
//!
//! One client per area of the backend:
//!
//! | Client | Base path | Token |
//! |---|---|---|
//! | [`ConsumerClient`] | `{api}/consumer` | yes |
//! | [`PromoterClient`] | `{api}/promoter` | yes |
//! | [`AdminClient`] | `{api}/admin` | yes |
//! | [`PublicClient`] | `{api}/generic/service` | no |
//! | [`AccessClient`] | `{api}/generic/access` | no |
//!
//! All of them share a [`ScopedClient`] core and send through the session
//! store's gateway. One request per call; nothing is retried or cached.
//! Every failure comes back as a
//! [`SessionError`](pareidolia_session::SessionError).

mod access;
mod admin;
mod consumer;
mod promoter;
mod public;
mod scoped;

pub use access::AccessClient;
pub use admin::AdminClient;
pub use consumer::ConsumerClient;
pub use promoter::PromoterClient;
pub use public::PublicClient;
pub use scoped::{ImageFile, Scope, ScopedClient};
