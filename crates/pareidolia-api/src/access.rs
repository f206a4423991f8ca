//! Login, registration, and password recovery.
//!
//! These calls only talk to the backend. Turning a successful login into
//! a session is the caller's job (`SessionStore::set_token` with the
//! returned token and role).

use pareidolia_model::{AccountLogin, LoginDto, RegistrationDto};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::HttpTransport;

use crate::scoped::{Scope, ScopedClient};

/// Client for `{api}/generic/access`.
#[derive(Debug)]
pub struct AccessClient<T> {
    core: ScopedClient<T>,
}

impl<T> Clone for AccessClient<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: HttpTransport> AccessClient<T> {
    pub fn new(store: SessionStore<T>) -> Self {
        Self {
            core: ScopedClient::new(store, Scope::Access),
        }
    }

    pub async fn login(&self, credentials: &LoginDto) -> Result<AccountLogin, SessionError> {
        tracing::debug!(email = %credentials.email, "logging in");
        self.core.post("login", credentials).await
    }

    /// Creates a consumer account and logs it in.
    pub async fn register(
        &self,
        registration: &RegistrationDto,
    ) -> Result<AccountLogin, SessionError> {
        tracing::debug!(email = %registration.email, "registering");
        self.core.post("register", registration).await
    }

    /// Asks the backend to mail a password reset to `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<(), SessionError> {
        self.core
            .post_query("forgotPassword", &[("email", email)])
            .await
    }
}
