//! Route guards and navigation for the Pareidolia client.
//!
//! Every screen of the client lives at a path. Some paths are open to
//! anyone, some only to logged-in users, and some only to one role. This
//! crate decides who may enter where.
//!
//! # Key types
//!
//! - [`Guard`] — one entry check (authenticated, anonymous, or role)
//! - [`RouteTable`] — the ordered list of paths and their guards
//! - [`Router`] — runs the guards on navigation, publishes the location,
//!   and serves as the session's [`Navigator`](pareidolia_session::Navigator)

mod error;
mod guard;
mod route;
mod router;

pub use error::GuardError;
pub use guard::{Guard, GuardOutcome, GuardRoutes, HOME_ROUTE, LOGIN_ROUTE};
pub use route::{NOT_FOUND_ROUTE, Route, RouteMatch, RouteTable, normalize_path};
pub use router::{Navigation, Router};
