//! Error types for the routing layer.

/// Errors that can occur while navigating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// Guards and redirect routes kept bouncing the navigation around.
    #[error("navigation to {path} exceeded {hops} redirects")]
    TooManyRedirects { path: String, hops: usize },

    /// No route matched, and the table has no wildcard entry.
    #[error("no route matches {0}")]
    NoRoute(String),
}
