//! The shared view of the session: persisted credentials plus the
//! published identity.
//!
//! [`SessionHandle`] is the part of the session that doesn't need a
//! transport. The gateway holds one so it can log out on a 401, and the
//! guards hold one so they can read the identity, which means neither of
//! them depends on the full [`SessionStore`](crate::SessionStore).

use std::sync::Arc;

use pareidolia_model::{Identity, Role};
use tokio::sync::watch;

use crate::{
    CredentialStore, Credentials, InitSignal, ROLE_KEY, SessionState, StorageError, TOKEN_KEY,
};

struct HandleInner {
    storage: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    initialized: InitSignal,
}

/// A cheap, cloneable reference to the session.
///
/// All clones see the same credentials and the same published state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &*self.inner.state.borrow())
            .field("initialized", &self.inner.initialized.is_complete())
            .finish()
    }
}

impl SessionHandle {
    /// Creates a handle over `storage`. The published state starts as
    /// [`SessionState::Unresolved`] and the init signal starts pending.
    pub fn new(storage: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unresolved);
        Self {
            inner: Arc::new(HandleInner {
                storage,
                state,
                initialized: InitSignal::new(),
            }),
        }
    }

    /// `true` when a non-empty token is persisted.
    ///
    /// This only looks at storage. It says nothing about whether the
    /// backend still accepts the token.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// The persisted token, if any. An empty string counts as absent.
    pub fn token(&self) -> Option<String> {
        self.inner
            .storage
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    /// The persisted role. An unrecognized value counts as absent.
    pub fn role(&self) -> Option<Role> {
        let raw = self.inner.storage.get(ROLE_KEY)?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring unrecognized persisted role");
                None
            }
        }
    }

    /// Both halves of the persisted pair, or `None` if either is missing.
    pub fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            token: self.token()?,
            role: self.role()?,
        })
    }

    /// Removes the persisted pair and publishes [`SessionState::Absent`].
    ///
    /// Idempotent. A storage failure is logged; the published state is
    /// cleared regardless so the client never keeps acting as a user it
    /// just decided to forget.
    pub fn logout(&self) {
        if let Err(e) = self.clear_pair() {
            tracing::error!(error = %e, "failed to remove persisted credentials");
        }
        self.publish(SessionState::Absent);
        tracing::info!("logged out");
    }

    /// A snapshot of the published state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// A snapshot of the published identity.
    pub fn current_identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    /// Subscribes to state changes. The receiver sees the current value
    /// immediately and every later publication.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// The startup-resolution signal.
    pub fn initialized(&self) -> &InitSignal {
        &self.inner.initialized
    }

    /// Publishes `state`. Subscribers are only woken when it differs from
    /// the current value. Returns whether it did.
    pub(crate) fn publish(&self, state: SessionState) -> bool {
        self.inner.state.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        })
    }

    /// `true` while `token` is still the persisted token.
    pub(crate) fn holds_token(&self, token: &str) -> bool {
        self.token().as_deref() == Some(token)
    }

    pub(crate) fn write_pair(&self, token: &str, role: Role) -> Result<(), StorageError> {
        self.inner
            .storage
            .set_many(&[(TOKEN_KEY, token), (ROLE_KEY, role.as_str())])
    }

    pub(crate) fn clear_pair(&self) -> Result<(), StorageError> {
        self.inner.storage.remove_many(&[TOKEN_KEY, ROLE_KEY])
    }
}

#[cfg(test)]
mod tests {
    use pareidolia_model::Account;

    use super::*;
    use crate::MemoryStorage;

    fn handle_with(entries: &[(&str, &str)]) -> (SessionHandle, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::with_entries(entries.iter().copied()));
        (SessionHandle::new(storage.clone()), storage)
    }

    #[test]
    fn test_new_handle_is_unresolved() {
        let (handle, _) = handle_with(&[]);

        assert_eq!(handle.state(), SessionState::Unresolved);
        assert!(!handle.initialized().is_complete());
        assert!(!handle.is_logged_in());
    }

    #[test]
    fn test_is_logged_in_ignores_empty_token() {
        let (handle, _) = handle_with(&[(TOKEN_KEY, "")]);
        assert!(!handle.is_logged_in());
        assert_eq!(handle.token(), None);
    }

    #[test]
    fn test_role_unrecognized_returns_none() {
        let (handle, _) = handle_with(&[(TOKEN_KEY, "t"), (ROLE_KEY, "GUEST")]);

        assert_eq!(handle.role(), None);
        assert!(handle.credentials().is_none());
        assert!(handle.is_logged_in());
    }

    #[test]
    fn test_credentials_reads_pair() {
        let (handle, _) = handle_with(&[(TOKEN_KEY, "abc123"), (ROLE_KEY, "PROMOTER")]);

        let creds = handle.credentials().unwrap();
        assert_eq!(creds.token, "abc123");
        assert_eq!(creds.role, Role::Promoter);
    }

    #[test]
    fn test_write_pair_then_clear_pair() {
        let (handle, storage) = handle_with(&[]);

        handle.write_pair("t", Role::Admin).unwrap();
        assert_eq!(storage.get(ROLE_KEY).as_deref(), Some("ADMIN"));

        handle.clear_pair().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_logout_clears_storage_and_publishes_absent() {
        let (handle, storage) = handle_with(&[(TOKEN_KEY, "t"), (ROLE_KEY, "CONSUMER")]);
        handle.publish(SessionState::Authenticated(Identity::Consumer(Account {
            id: 3,
            ..Account::default()
        })));
        let rx = handle.subscribe();

        handle.logout();

        assert!(storage.is_empty());
        assert_eq!(*rx.borrow(), SessionState::Absent);
        assert_eq!(handle.current_identity(), None);

        // A second logout changes nothing.
        handle.logout();
        assert_eq!(handle.state(), SessionState::Absent);
    }

    #[test]
    fn test_publish_same_state_does_not_notify() {
        let (handle, _) = handle_with(&[]);
        let mut rx = handle.subscribe();

        assert!(handle.publish(SessionState::Absent));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(!handle.publish(SessionState::Absent));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_holds_token_after_logout_is_false() {
        let (handle, _) = handle_with(&[(TOKEN_KEY, "abc123"), (ROLE_KEY, "PROMOTER")]);
        assert!(handle.holds_token("abc123"));
        assert!(!handle.holds_token("other"));

        handle.logout();

        assert!(!handle.holds_token("abc123"));
    }

    #[test]
    fn test_clones_share_state() {
        let (handle, _) = handle_with(&[]);
        let clone = handle.clone();

        clone.publish(SessionState::Absent);

        assert_eq!(handle.state(), SessionState::Absent);
    }
}
