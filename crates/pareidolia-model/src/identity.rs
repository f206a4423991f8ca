//! Identity types: who is logged in, and in which role.
//!
//! The backend has three kinds of accounts. They share the same core
//! fields and differ in one discriminant field, `referenceType`:
//!
//! ```text
//! { "id": 1, "email": "...", ..., "referenceType": "PROMOTER", "photo": "..." }
//! ```
//!
//! We model that as a Rust enum whose variant is picked by the
//! discriminant. Once you hold an [`Identity`], the variant tells you which
//! optional fields mean anything: only a promoter has a photo.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The role discriminant of an account.
///
/// On the wire (and in persisted storage) it is spelled as one of three
/// upper-case literals: `CONSUMER`, `PROMOTER`, `ADMIN`. Anything else is
/// rejected, so a `Role` value is always one of the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Books events and writes reviews.
    Consumer,
    /// Organises events.
    Promoter,
    /// Manages every account and event.
    Admin,
}

impl Role {
    /// All roles, in discriminant order.
    pub const ALL: [Role; 3] = [Role::Consumer, Role::Promoter, Role::Admin];

    /// Returns the wire literal for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "CONSUMER",
            Self::Promoter => "PROMOTER",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns the path segment the backend uses for this role's
    /// endpoints (`/consumer`, `/promoter`, `/admin`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Promoter => "promoter",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONSUMER" => Ok(Self::Consumer),
            "PROMOTER" => Ok(Self::Promoter),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Account / Promoter
// ---------------------------------------------------------------------------

/// Fields every account carries, whatever its role.
///
/// `creation_time` is kept as the backend's text form; the client only
/// displays it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

/// A promoter account: the common fields plus a public profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promoter {
    #[serde(flatten)]
    pub account: Account,

    /// Image reference of the promoter's profile photo, if uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Free-text presentation shown on the public profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The authenticated account, tagged by role.
///
/// `#[serde(tag = "referenceType")]` makes this an "internally tagged" enum:
/// the discriminant sits next to the other fields instead of wrapping them.
///
/// ```rust
/// use pareidolia_model::{Identity, Role};
///
/// let json = r#"{"id":1,"email":"a@b.com","name":"A","surname":"B",
///                "phone":"","referenceType":"PROMOTER","photo":"p.png"}"#;
/// let identity: Identity = serde_json::from_str(json).unwrap();
///
/// assert_eq!(identity.role(), Role::Promoter);
/// assert_eq!(identity.id(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "referenceType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Identity {
    Consumer(Account),
    Promoter(Promoter),
    Admin(Account),
}

impl Identity {
    /// Returns the role discriminant of this identity.
    pub fn role(&self) -> Role {
        match self {
            Self::Consumer(_) => Role::Consumer,
            Self::Promoter(_) => Role::Promoter,
            Self::Admin(_) => Role::Admin,
        }
    }

    /// Returns the common account fields.
    pub fn account(&self) -> &Account {
        match self {
            Self::Consumer(account) | Self::Admin(account) => account,
            Self::Promoter(promoter) => &promoter.account,
        }
    }

    pub fn id(&self) -> i64 {
        self.account().id
    }

    pub fn email(&self) -> &str {
        &self.account().email
    }

    /// "Name Surname", trimmed when either part is empty.
    pub fn display_name(&self) -> String {
        let account = self.account();
        format!("{} {}", account.name, account.surname)
            .trim()
            .to_string()
    }

    /// Returns the promoter profile if this is a promoter.
    pub fn as_promoter(&self) -> Option<&Promoter> {
        match self {
            Self::Promoter(promoter) => Some(promoter),
            _ => None,
        }
    }
}

/// The body of a successful login or registration:
/// the identity plus the bearer token to use from now on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLogin {
    pub auth_token: String,

    #[serde(flatten)]
    pub identity: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64) -> Account {
        Account {
            id,
            email: "a@b.com".into(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            phone: "555".into(),
            creation_time: None,
        }
    }

    // =====================================================================
    // Role
    // =====================================================================

    #[test]
    fn test_role_from_str_accepts_three_literals() {
        assert_eq!("CONSUMER".parse::<Role>().unwrap(), Role::Consumer);
        assert_eq!("PROMOTER".parse::<Role>().unwrap(), Role::Promoter);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_from_str_rejects_other_spellings() {
        // The literals are case-sensitive.
        for bad in ["admin", "Admin", "", "ROOT"] {
            assert!(
                matches!(bad.parse::<Role>(), Err(ModelError::UnknownRole(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_role_display_matches_wire_literal() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
    }

    #[test]
    fn test_role_path_segment() {
        assert_eq!(Role::Consumer.path_segment(), "consumer");
        assert_eq!(Role::Promoter.path_segment(), "promoter");
        assert_eq!(Role::Admin.path_segment(), "admin");
    }

    // =====================================================================
    // Identity
    // =====================================================================

    #[test]
    fn test_identity_decode_picks_variant_from_discriminant() {
        let json = r#"{"id":7,"email":"c@d.com","name":"C","surname":"D",
                       "phone":"1","referenceType":"CONSUMER",
                       "creationTime":"2024-05-01T10:00:00.000Z"}"#;

        let identity: Identity = serde_json::from_str(json).unwrap();

        assert_eq!(identity.role(), Role::Consumer);
        assert_eq!(identity.id(), 7);
        assert_eq!(
            identity.account().creation_time.as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );
    }

    #[test]
    fn test_identity_decode_promoter_keeps_profile_fields() {
        let json = r#"{"id":1,"email":"a@b.com","name":"A","surname":"B",
                       "phone":"","referenceType":"PROMOTER",
                       "photo":"p.png","presentation":"hello"}"#;

        let identity: Identity = serde_json::from_str(json).unwrap();
        let promoter = identity.as_promoter().expect("should be a promoter");

        assert_eq!(promoter.photo.as_deref(), Some("p.png"));
        assert_eq!(promoter.presentation.as_deref(), Some("hello"));
    }

    #[test]
    fn test_identity_decode_unknown_discriminant_fails() {
        let json = r#"{"id":1,"email":"a@b.com","referenceType":"ROOT"}"#;

        let result: Result<Identity, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn test_identity_encode_writes_discriminant() {
        let identity = Identity::Admin(account(3));

        let value = serde_json::to_value(&identity).unwrap();

        assert_eq!(value["referenceType"], "ADMIN");
        assert_eq!(value["id"], 3);
        // Optional fields that are unset stay off the wire.
        assert!(value.get("creationTime").is_none());
    }

    #[test]
    fn test_identity_display_name_trims_missing_parts() {
        let mut acc = account(1);
        acc.surname.clear();

        assert_eq!(Identity::Consumer(acc).display_name(), "Ada");
        assert_eq!(
            Identity::Consumer(account(1)).display_name(),
            "Ada Lovelace"
        );
    }

    #[test]
    fn test_as_promoter_none_for_other_roles() {
        assert!(Identity::Consumer(account(1)).as_promoter().is_none());
        assert!(Identity::Admin(account(1)).as_promoter().is_none());
    }

    // =====================================================================
    // AccountLogin
    // =====================================================================

    #[test]
    fn test_account_login_decode_splits_token_and_identity() {
        let json = r#"{"authToken":"abc123","id":1,"email":"a@b.com",
                       "name":"A","surname":"B","phone":"",
                       "referenceType":"PROMOTER"}"#;

        let login: AccountLogin = serde_json::from_str(json).unwrap();

        assert_eq!(login.auth_token, "abc123");
        assert_eq!(login.identity.role(), Role::Promoter);
        assert_eq!(login.identity.email(), "a@b.com");
    }
}
