//! The session store: the single source of truth for "who is logged in".
//!
//! It combines the [`SessionHandle`] (persisted pair + published state)
//! with a [`Gateway`] so it can ask the backend who the token belongs to.
//!
//! # Startup
//!
//! [`SessionStore::start`] resolves the persisted session once:
//!
//! ```text
//!   token persisted? ──yes──→ spawn refresh ──→ Authenticated | Absent ──┐
//!         │                                                              ├─→ complete init signal
//!         └──no──→ publish Absent ───────────────────────────────────────┘
//! ```
//!
//! # Serialization
//!
//! `set_token` and `refresh_current_identity` both take an async mutex
//! for their whole duration, including the network round trip. Two
//! overlapping logins therefore run one after the other, and the pair on
//! disk always matches the identity that was published last.
//!
//! `logout` doesn't wait for the mutex. A refresh whose token was removed
//! while its request was in flight publishes nothing.

use std::sync::Arc;

use pareidolia_model::{Identity, Role};
use pareidolia_transport::{ApiRequest, HttpTransport};
use tokio::sync::{Mutex, watch};

use crate::{
    Credentials, Gateway, InitSignal, Navigator, SessionConfig, SessionError, SessionHandle,
    SessionState,
};

/// Owns the session and the gateway all requests go through.
///
/// Cheap to clone; clones share everything.
pub struct SessionStore<T> {
    handle: SessionHandle,
    gateway: Arc<Gateway<T>>,
    config: Arc<SessionConfig>,
    refresh_lock: Arc<Mutex<()>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            gateway: Arc::clone(&self.gateway),
            config: Arc::clone(&self.config),
            refresh_lock: Arc::clone(&self.refresh_lock),
        }
    }
}

impl<T> std::fmt::Debug for SessionStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("handle", &self.handle)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Abandons the init signal if the startup task ends without completing
/// it (panic or runtime shutdown).
struct AbandonOnDrop(InitSignal);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        if self.0.abandon() {
            tracing::warn!("startup session refresh ended before completing");
        }
    }
}

impl<T: HttpTransport> SessionStore<T> {
    /// Builds the store and runs the startup protocol.
    ///
    /// With persisted credentials the refresh runs on a spawned task and
    /// this returns at once; the published state stays
    /// [`SessionState::Unresolved`] until it finishes. A failed refresh is
    /// logged, never returned. Without credentials the state is
    /// [`SessionState::Absent`] before this returns.
    ///
    /// # Panics
    /// Panics if persisted credentials exist and this is called outside a
    /// Tokio runtime.
    pub fn start(
        config: SessionConfig,
        transport: T,
        handle: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let gateway = Gateway::new(transport, handle.clone(), navigator, &config.login_route);
        let store = Self {
            handle,
            gateway: Arc::new(gateway),
            config: Arc::new(config),
            refresh_lock: Arc::new(Mutex::new(())),
        };

        if store.is_logged_in() {
            tracing::debug!("persisted token found, refreshing identity");
            let task = store.clone();
            tokio::spawn(async move {
                let guard = AbandonOnDrop(task.handle.initialized().clone());
                if let Err(e) = task.refresh_current_identity().await {
                    tracing::warn!(error = %e, "startup identity refresh failed");
                }
                guard.0.complete();
            });
        } else {
            store.handle.publish(SessionState::Absent);
            store.handle.initialized().complete();
        }

        store
    }

    /// Persists a new credential pair and resolves its identity.
    ///
    /// Returns what the refresh returned: the identity, or the normalized
    /// error after the pair has been cleared again.
    ///
    /// # Errors
    /// - [`SessionError::Storage`] — the pair couldn't be written; the
    ///   published state is `Absent`
    /// - anything [`refresh_current_identity`](Self::refresh_current_identity)
    ///   returns
    pub async fn set_token(
        &self,
        token: &str,
        role: Role,
    ) -> Result<Option<Identity>, SessionError> {
        let _serial = self.refresh_lock.lock().await;

        if let Err(e) = self.handle.write_pair(token, role) {
            if let Err(clear) = self.handle.clear_pair() {
                tracing::error!(error = %clear, "failed to clear half-written credentials");
            }
            self.handle.publish(SessionState::Absent);
            return Err(e.into());
        }
        tracing::debug!(%role, "credential pair stored");

        self.refresh_locked().await
    }

    /// Re-validates the persisted pair against the backend.
    ///
    /// - Missing token or role: clears the pair, publishes `Absent`,
    ///   returns `Ok(None)`.
    /// - Backend confirms: publishes the identity, returns it.
    /// - Backend refuses: clears the pair, publishes `Absent`, returns the
    ///   normalized error.
    ///
    /// Publishes at most one state either way, and none when a logout
    /// ended the session while the request was in flight.
    pub async fn refresh_current_identity(&self) -> Result<Option<Identity>, SessionError> {
        let _serial = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<Option<Identity>, SessionError> {
        let Some(Credentials { token, role }) = self.handle.credentials() else {
            if let Err(e) = self.handle.clear_pair() {
                tracing::error!(error = %e, "failed to clear partial credentials");
            }
            self.handle.publish(SessionState::Absent);
            return Ok(None);
        };

        let request = ApiRequest::get(self.config.identity_endpoint(role)).bearer(&token);
        let result = self.gateway.send_json::<Identity>(request).await;

        // A logout while the request was in flight already cleared the pair
        // and published `Absent`. The answer belongs to a dead session.
        if !self.handle.holds_token(&token) {
            tracing::debug!("session ended during identity refresh, discarding result");
            return result.map(|_| None);
        }

        match result {
            Ok(identity) => {
                tracing::info!(
                    id = identity.id(),
                    role = %identity.role(),
                    "session identity resolved"
                );
                self.handle
                    .publish(SessionState::Authenticated(identity.clone()));
                Ok(Some(identity))
            }
            Err(e) => {
                if let Err(clear) = self.handle.clear_pair() {
                    tracing::error!(error = %clear, "failed to clear rejected credentials");
                }
                self.handle.publish(SessionState::Absent);
                Err(e)
            }
        }
    }
}

impl<T> SessionStore<T> {
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn gateway(&self) -> &Arc<Gateway<T>> {
        &self.gateway
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_logged_in(&self) -> bool {
        self.handle.is_logged_in()
    }

    pub fn token(&self) -> Option<String> {
        self.handle.token()
    }

    pub fn role(&self) -> Option<Role> {
        self.handle.role()
    }

    /// Clears the persisted pair and publishes `Absent`. No network call.
    pub fn logout(&self) {
        self.handle.logout();
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.handle.current_identity()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.handle.subscribe()
    }

    pub fn initialized(&self) -> &InitSignal {
        self.handle.initialized()
    }
}
