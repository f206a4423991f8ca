//! The three route guards.
//!
//! A guard answers "may the user enter this route?" with either
//! [`GuardOutcome::Allow`] or a redirect. Every guard first waits for the
//! session's init signal, so a guard evaluated during startup doesn't
//! mistake an unresolved session for a logged-out one.

use pareidolia_model::Role;
use pareidolia_session::{SessionHandle, SessionState};

/// Where unauthenticated users are sent.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Where authenticated users are sent away from anonymous-only pages.
pub const HOME_ROUTE: &str = "/";

/// The redirect targets guards send users to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRoutes {
    /// Target for users who must log in first.
    pub login: String,
    /// Target for logged-in users leaving an anonymous-only page.
    pub home: String,
}

impl GuardRoutes {
    /// Both paths are normalized.
    pub fn new(login: &str, home: &str) -> Self {
        Self {
            login: crate::normalize_path(login),
            home: crate::normalize_path(home),
        }
    }
}

impl Default for GuardRoutes {
    fn default() -> Self {
        Self::new(LOGIN_ROUTE, HOME_ROUTE)
    }
}

/// The result of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }
}

/// A navigation guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Only a logged-in user may enter.
    RequireAuthenticated,
    /// Only a logged-out user may enter (login, signup, forgot password).
    RequireAnonymous,
    /// Only a user with exactly this role may enter.
    RequireRole(Role),
}

impl Guard {
    /// Waits for startup resolution, then checks the published state,
    /// redirecting to [`LOGIN_ROUTE`] and [`HOME_ROUTE`].
    ///
    /// An abandoned init signal is ignored; the state is read as-is, and
    /// an unresolved state counts as "no identity".
    pub async fn can_enter(&self, session: &SessionHandle) -> GuardOutcome {
        self.can_enter_with(session, &GuardRoutes::default()).await
    }

    /// [`can_enter`](Self::can_enter) with custom redirect targets.
    pub async fn can_enter_with(
        &self,
        session: &SessionHandle,
        routes: &GuardRoutes,
    ) -> GuardOutcome {
        let _ = session.initialized().wait().await;
        self.check_with(&session.state(), routes)
    }

    /// The decision for a given state, without waiting.
    pub fn check(&self, state: &SessionState) -> GuardOutcome {
        self.check_with(state, &GuardRoutes::default())
    }

    pub fn check_with(&self, state: &SessionState, routes: &GuardRoutes) -> GuardOutcome {
        let identity = state.identity();
        match self {
            Self::RequireAuthenticated => match identity {
                Some(_) => GuardOutcome::Allow,
                None => GuardOutcome::redirect(&routes.login),
            },
            Self::RequireAnonymous => match identity {
                Some(_) => GuardOutcome::redirect(&routes.home),
                None => GuardOutcome::Allow,
            },
            Self::RequireRole(role) => match identity {
                Some(identity) if identity.role() == *role => GuardOutcome::Allow,
                _ => GuardOutcome::redirect(&routes.login),
            },
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequireAuthenticated => f.write_str("RequireAuthenticated"),
            Self::RequireAnonymous => f.write_str("RequireAnonymous"),
            Self::RequireRole(role) => write!(f, "RequireRole({role})"),
        }
    }
}
