//! `PareidoliaClient` builder and context object.
//!
//! This is the entry point of the library. It ties together all the
//! layers: transport → session → guards → API clients.

use std::sync::Arc;

use pareidolia_api::{AccessClient, AdminClient, ConsumerClient, PromoterClient, PublicClient};
use pareidolia_guard::{GuardRoutes, Navigation, Router};
use pareidolia_model::{AccountLogin, Identity, LoginDto, RegistrationDto};
use pareidolia_session::{
    CredentialStore, FileStorage, MemoryStorage, SessionHandle, SessionStore,
};
use pareidolia_transport::{HttpTransport, ReqwestTransport};

use crate::{ClientConfig, PareidoliaError};

/// Builder for a [`PareidoliaClient`].
///
/// # Example
///
/// ```rust,no_run
/// use pareidolia::prelude::*;
///
/// # async fn run() -> Result<(), PareidoliaError> {
/// let client = PareidoliaClient::builder()
///     .config(ClientConfig::load(None)?)
///     .build()?;
///
/// client.wait_until_ready().await;
/// let identity = client.login("pro@pareidolia.io", "secret").await?;
/// println!("hello {}", identity.display_name());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PareidoliaClientBuilder {
    config: ClientConfig,
    storage: Option<Arc<dyn CredentialStore>>,
}

impl PareidoliaClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `storage` for the credential pair instead of the one
    /// `storage_path` would select.
    pub fn storage(mut self, storage: Arc<dyn CredentialStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Builds the client over a `reqwest` transport.
    ///
    /// # Errors
    /// Fails if the HTTP client can't be built or the storage file can't
    /// be opened.
    ///
    /// # Panics
    /// Panics outside a Tokio runtime when persisted credentials exist
    /// (see [`SessionStore::start`]).
    pub fn build(self) -> Result<PareidoliaClient<ReqwestTransport>, PareidoliaError> {
        let transport = ReqwestTransport::new(self.config.timeout())?;
        self.build_with_transport(transport)
    }

    /// Builds the client over any transport. Used by tests with scripted
    /// transports.
    pub fn build_with_transport<T: HttpTransport>(
        self,
        transport: T,
    ) -> Result<PareidoliaClient<T>, PareidoliaError> {
        let storage: Arc<dyn CredentialStore> = match (self.storage, &self.config.storage_path) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(FileStorage::open(path)?),
            (None, None) => Arc::new(MemoryStorage::new()),
        };

        let handle = SessionHandle::new(storage);
        let guard_routes = GuardRoutes::new(&self.config.login_route, &self.config.home_route);
        let router = Router::application_with(handle.clone(), guard_routes);
        let store = SessionStore::start(
            self.config.session_config(),
            transport,
            handle,
            Arc::new(router.clone()),
        );

        tracing::debug!(api_url = %self.config.api_url, "client built");
        Ok(PareidoliaClient {
            consumer: ConsumerClient::new(store.clone()),
            promoter: PromoterClient::new(store.clone()),
            admin: AdminClient::new(store.clone()),
            public: PublicClient::new(store.clone()),
            access: AccessClient::new(store.clone()),
            store,
            router,
            config: Arc::new(self.config),
        })
    }
}

/// The client context: one session, one router, and every API client,
/// all sharing the same transport.
///
/// Cheap to clone.
pub struct PareidoliaClient<T = ReqwestTransport> {
    store: SessionStore<T>,
    router: Router,
    consumer: ConsumerClient<T>,
    promoter: PromoterClient<T>,
    admin: AdminClient<T>,
    public: PublicClient<T>,
    access: AccessClient<T>,
    config: Arc<ClientConfig>,
}

impl<T> Clone for PareidoliaClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            router: self.router.clone(),
            consumer: self.consumer.clone(),
            promoter: self.promoter.clone(),
            admin: self.admin.clone(),
            public: self.public.clone(),
            access: self.access.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl PareidoliaClient {
    pub fn builder() -> PareidoliaClientBuilder {
        PareidoliaClientBuilder::new()
    }
}

impl<T: HttpTransport> PareidoliaClient<T> {
    pub fn store(&self) -> &SessionStore<T> {
        &self.store
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn consumer(&self) -> &ConsumerClient<T> {
        &self.consumer
    }

    pub fn promoter(&self) -> &PromoterClient<T> {
        &self.promoter
    }

    pub fn admin(&self) -> &AdminClient<T> {
        &self.admin
    }

    pub fn public(&self) -> &PublicClient<T> {
        &self.public
    }

    pub fn access(&self) -> &AccessClient<T> {
        &self.access
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Waits for the startup session refresh to settle.
    pub async fn wait_until_ready(&self) {
        let _ = self.store.initialized().wait().await;
    }

    /// Logs in and enters the home route.
    ///
    /// # Errors
    /// - [`PareidoliaError::Session`] — the backend refused the
    ///   credentials, or refused the token it just issued
    /// - [`PareidoliaError::MissingToken`] — the backend sent an empty token
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, PareidoliaError> {
        let credentials = LoginDto {
            email: email.to_string(),
            password: password.to_string(),
        };
        let login = self.access.login(&credentials).await?;
        let identity = self.adopt(login).await?;
        self.router.navigate(&self.config.home_route).await?;
        Ok(identity)
    }

    /// Registers a consumer account and logs it in.
    pub async fn register(
        &self,
        registration: &RegistrationDto,
    ) -> Result<Identity, PareidoliaError> {
        let login = self.access.register(registration).await?;
        let identity = self.adopt(login).await?;
        self.router.navigate(&self.config.home_route).await?;
        Ok(identity)
    }

    /// Makes a login response the current session.
    ///
    /// Also used after profile updates, which return a fresh token.
    pub async fn adopt(&self, login: AccountLogin) -> Result<Identity, PareidoliaError> {
        let role = login.identity.role();
        let identity = self
            .store
            .set_token(&login.auth_token, role)
            .await?
            .ok_or(PareidoliaError::MissingToken)?;
        tracing::info!(id = identity.id(), %role, "logged in");
        Ok(identity)
    }

    /// Ends the session and enters the home route. No network call.
    pub async fn logout(&self) -> Result<Navigation, PareidoliaError> {
        self.store.logout();
        Ok(self.router.navigate(&self.config.home_route).await?)
    }

    /// Navigates, running the target route's guards.
    pub async fn navigate(&self, path: &str) -> Result<Navigation, PareidoliaError> {
        Ok(self.router.navigate(path).await?)
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.store.current_identity()
    }
}
