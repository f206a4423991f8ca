//! Session types: the data structures that describe who is logged in.
//!
//! A client session is three things:
//! - WHAT the client currently believes (`SessionState`)
//! - WHAT it has persisted to prove it (`Credentials`)
//! - WHERE it checks those credentials (`SessionConfig`)

use pareidolia_model::{Identity, Role};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session layer.
///
/// Defaults match a backend running locally on port 8080.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the backend, without a trailing slash.
    pub api_url: String,

    /// Where the gateway sends the user after a 401.
    pub login_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            login_route: "/auth/login".to_string(),
        }
    }
}

impl SessionConfig {
    /// Base URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// The "who am I" endpoint for a role: `{api}/{role}/data`.
    pub fn identity_endpoint(&self, role: Role) -> String {
        format!("{}/{}/data", self.base_url(), role.path_segment())
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current published answer to "who is logged in?".
///
/// ```text
///   Unresolved ──(startup refresh)──→ Authenticated ──(logout / 401)──→ Absent
///       │                                  ↑                               │
///       └──────────(no credentials)────→ Absent ──(login / set_token)──────┘
/// ```
///
/// - **Unresolved**: only between process start and the end of the
///   startup refresh. Guards wait for the init signal before reading, so
///   they don't mistake this for "logged out".
/// - **Absent**: no valid session.
/// - **Authenticated**: the backend confirmed this identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unresolved,
    Absent,
    Authenticated(Identity),
}

impl SessionState {
    /// Returns the identity, if authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The role of the authenticated identity.
    pub fn role(&self) -> Option<Role> {
        self.identity().map(Identity::role)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl From<Option<Identity>> for SessionState {
    fn from(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Self::Authenticated(identity),
            None => Self::Absent,
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The persisted credential pair. Both halves are present or neither is.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub role: Role,
}

/// The token is a secret; keep it out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pareidolia_model::Account;

    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.login_route, "/auth/login");
    }

    #[test]
    fn test_identity_endpoint_per_role() {
        let config = SessionConfig {
            api_url: "http://api.test/".to_string(),
            ..SessionConfig::default()
        };

        assert_eq!(
            config.identity_endpoint(Role::Consumer),
            "http://api.test/consumer/data"
        );
        assert_eq!(
            config.identity_endpoint(Role::Promoter),
            "http://api.test/promoter/data"
        );
        assert_eq!(
            config.identity_endpoint(Role::Admin),
            "http://api.test/admin/data"
        );
    }

    #[test]
    fn test_session_config_deserialize_partial() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"api_url":"https://prod"}"#).unwrap();

        assert_eq!(config.api_url, "https://prod");
        assert_eq!(config.login_route, "/auth/login");
    }

    #[test]
    fn test_session_state_default_is_unresolved() {
        let state = SessionState::default();
        assert!(!state.is_resolved());
        assert!(!state.is_authenticated());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn test_session_state_from_option() {
        let identity = Identity::Admin(Account {
            id: 1,
            ..Account::default()
        });

        let state = SessionState::from(Some(identity.clone()));
        assert_eq!(state.identity(), Some(&identity));
        assert_eq!(state.role(), Some(Role::Admin));

        assert_eq!(SessionState::from(None), SessionState::Absent);
        assert!(SessionState::Absent.is_resolved());
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = Credentials {
            token: "abc123".into(),
            role: Role::Promoter,
        };

        let debug = format!("{creds:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("Promoter"));
    }
}
