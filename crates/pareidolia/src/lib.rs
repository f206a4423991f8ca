//! # Pareidolia
//!
//! Session-aware client for the Pareidolia event platform.
//!
//! The client keeps one answer to "who is logged in?", re-validates it at
//! startup, ends it when the backend answers 401, and gates navigation on
//! it. Everything hangs off one context object, [`PareidoliaClient`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pareidolia::prelude::*;
//!
//! # async fn run() -> Result<(), PareidoliaError> {
//! let client = PareidoliaClient::builder().build()?;
//! client.wait_until_ready().await;
//!
//! let events = client.public().events(None).await?;
//! for event in events.content {
//!     println!("{}", event.title);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::{PareidoliaClient, PareidoliaClientBuilder};
pub use config::{
    ClientConfig, ENV_API_URL, ENV_HOME_ROUTE, ENV_LOGIN_ROUTE, ENV_STORAGE_PATH,
    ENV_TIMEOUT_SECS,
};
pub use error::{ConfigError, PareidoliaError};

pub use pareidolia_api as api;
pub use pareidolia_guard as guard;
pub use pareidolia_model as model;
pub use pareidolia_session as session;
pub use pareidolia_transport as transport;

/// The types most callers need.
pub mod prelude {
    pub use crate::{ClientConfig, PareidoliaClient, PareidoliaError};
    pub use pareidolia_api::{
        AccessClient, AdminClient, ConsumerClient, ImageFile, PromoterClient, PublicClient,
    };
    pub use pareidolia_guard::{Guard, GuardOutcome, Navigation, Router};
    pub use pareidolia_model::{
        Account, EventDto, EventState, Identity, Page, PageRequest, Promoter, Role,
    };
    pub use pareidolia_session::{SessionError, SessionState, SessionStore};
}
