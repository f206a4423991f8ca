//! The router: runs guards on navigation and tracks the current location.

use std::collections::HashMap;
use std::sync::Arc;

use pareidolia_session::{Navigator, SessionHandle};
use tokio::sync::watch;

use crate::{GuardError, GuardOutcome, GuardRoutes, RouteTable};

/// Redirects followed before a navigation is abandoned.
const DEFAULT_MAX_REDIRECTS: usize = 8;

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The path originally asked for, normalized.
    pub requested: String,
    /// The path actually entered.
    pub path: String,
    /// The pattern of the entered route.
    pub pattern: String,
    /// Parameters captured from `path`.
    pub params: HashMap<String, String>,
    /// Every intermediate redirect target, in order.
    pub redirects: Vec<String>,
    /// `true` when the entered route is the not-found page.
    pub not_found: bool,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

struct RouterInner {
    session: SessionHandle,
    table: RouteTable,
    guard_routes: GuardRoutes,
    location: watch::Sender<String>,
    max_redirects: usize,
}

/// Resolves paths against a [`RouteTable`] and runs each route's guards.
///
/// Cloneable; clones share the table and the location.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("location", &*self.inner.location.borrow())
            .field("routes", &self.inner.table.routes().len())
            .field("guard_routes", &self.inner.guard_routes)
            .finish()
    }
}

impl Router {
    /// A router starting at `/`. No guards run for the initial location.
    /// Guards redirect to the default login and home routes.
    pub fn new(session: SessionHandle, table: RouteTable) -> Self {
        Self::with_guard_routes(session, table, GuardRoutes::default())
    }

    /// A router whose guards redirect to `guard_routes`.
    pub fn with_guard_routes(
        session: SessionHandle,
        table: RouteTable,
        guard_routes: GuardRoutes,
    ) -> Self {
        let (location, _) = watch::channel("/".to_string());
        Self {
            inner: Arc::new(RouterInner {
                session,
                table,
                guard_routes,
                location,
                max_redirects: DEFAULT_MAX_REDIRECTS,
            }),
        }
    }

    /// A router over [`RouteTable::application`].
    pub fn application(session: SessionHandle) -> Self {
        Self::new(session, RouteTable::application())
    }

    /// A router over [`RouteTable::application_with`] whose guards use the
    /// same login and home routes.
    pub fn application_with(session: SessionHandle, guard_routes: GuardRoutes) -> Self {
        let table = RouteTable::application_with(&guard_routes);
        Self::with_guard_routes(session, table, guard_routes)
    }

    pub fn location(&self) -> String {
        self.inner.location.borrow().clone()
    }

    /// Subscribes to location changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.inner.location.subscribe()
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn guard_routes(&self) -> &GuardRoutes {
        &self.inner.guard_routes
    }

    /// Navigates to `path`.
    ///
    /// Resolves the path, follows redirect routes, and runs the matched
    /// route's guards in order; the first redirect wins and navigation
    /// starts over at its target. When a route is finally entered the new
    /// location is published.
    ///
    /// # Errors
    /// - [`GuardError::TooManyRedirects`] — redirects kept chaining; the
    ///   location is left unchanged
    /// - [`GuardError::NoRoute`] — nothing matched (only possible with a
    ///   custom table that lacks a `**` route)
    pub async fn navigate(&self, path: &str) -> Result<Navigation, GuardError> {
        let requested = crate::normalize_path(path);
        let mut target = requested.clone();
        let mut redirects = Vec::new();

        for _ in 0..=self.inner.max_redirects {
            let matched = self
                .inner
                .table
                .resolve(&target)
                .ok_or_else(|| GuardError::NoRoute(target.clone()))?;

            let next = match matched.route.redirect_to() {
                Some(to) => Some(to.to_string()),
                None => self.run_guards(&target, matched.route.guards()).await,
            };

            match next {
                Some(to) => {
                    target = crate::normalize_path(&to);
                    redirects.push(target.clone());
                }
                None => {
                    tracing::debug!(%requested, path = %target, "navigated");
                    let navigation = Navigation {
                        requested,
                        pattern: matched.route.pattern().to_string(),
                        params: matched.params,
                        redirects,
                        not_found: matched.route.is_not_found(),
                        path: target,
                    };
                    self.inner.location.send_replace(navigation.path.clone());
                    return Ok(navigation);
                }
            }
        }

        tracing::warn!(%requested, "navigation abandoned after too many redirects");
        Err(GuardError::TooManyRedirects {
            path: requested,
            hops: self.inner.max_redirects,
        })
    }

    /// Runs guards in order and returns the first redirect target.
    async fn run_guards(&self, path: &str, guards: &[crate::Guard]) -> Option<String> {
        for guard in guards {
            if let GuardOutcome::Redirect(to) = guard
                .can_enter_with(&self.inner.session, &self.inner.guard_routes)
                .await
            {
                tracing::debug!(%path, %guard, redirect = %to, "guard refused entry");
                return Some(to);
            }
        }
        None
    }
}

/// Lets the gateway send the user to the login page after a 401.
///
/// Inside a Tokio runtime the navigation runs on a spawned task, guards
/// included. Outside one the location is set directly.
impl Navigator for Router {
    fn request_navigation(&self, path: &str) {
        let path = path.to_string();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let router = self.clone();
                runtime.spawn(async move {
                    if let Err(e) = router.navigate(&path).await {
                        tracing::warn!(error = %e, "requested navigation failed");
                    }
                });
            }
            Err(_) => {
                self.inner
                    .location
                    .send_replace(crate::normalize_path(&path));
            }
        }
    }
}
