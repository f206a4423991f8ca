//! The route table: which paths exist and which guards protect them.

use std::collections::HashMap;

use pareidolia_model::Role;

use crate::{Guard, GuardRoutes};

/// Where unknown paths end up.
pub const NOT_FOUND_ROUTE: &str = "/404";

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// One entry in the route table.
///
/// A pattern is a `/`-separated path where a `:name` segment captures one
/// path segment and a lone `**` matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pattern: String,
    guards: Vec<Guard>,
    redirect_to: Option<String>,
    not_found: bool,
}

impl Route {
    /// A route with no guards.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            guards: Vec::new(),
            redirect_to: None,
            not_found: false,
        }
    }

    /// A route that immediately sends the user elsewhere. Redirect routes
    /// run no guards of their own; the target's guards apply.
    pub fn redirect(pattern: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            redirect_to: Some(to.into()),
            ..Self::new(pattern)
        }
    }

    /// Appends a guard. Guards run in the order they were added.
    pub fn guarded(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    /// Marks this route as the not-found page.
    pub fn not_found(mut self) -> Self {
        self.not_found = true;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn redirect_to(&self) -> Option<&str> {
        self.redirect_to.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    /// Matches `path` against this route's pattern, returning the captured
    /// parameters on success.
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        if self.pattern == "**" {
            return Some(HashMap::new());
        }

        let mut pattern = segments(&self.pattern);
        let mut actual = segments(path);
        let mut params = HashMap::new();
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(p), Some(a)) => {
                    if let Some(name) = p.strip_prefix(':') {
                        params.insert(name.to_string(), a.to_string());
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalizes a requested path: drops any query string or fragment,
/// collapses repeated slashes, and guarantees a single leading slash with
/// no trailing one.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined: Vec<&str> = segments(path).collect();
    format!("/{}", joined.join("/"))
}

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

/// A route matched against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

/// An ordered list of routes. The first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the first route matching `path` (normalized first).
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            route
                .matches(&path)
                .map(|params| RouteMatch { route, params })
        })
    }

    /// The Pareidolia client's routes.
    ///
    /// | Path | Guards |
    /// |---|---|
    /// | `/`, `/home`, `/events`, `/events/:id` | none |
    /// | `/auth/login`, `/auth/signup`, `/auth/forgot` | anonymous |
    /// | `/profile` | authenticated |
    /// | `/admin/...` | authenticated + `ADMIN` |
    /// | `/promoter/...` | authenticated + `PROMOTER` |
    /// | anything else | redirect to `/404` |
    pub fn application() -> Self {
        Self::application_with(&GuardRoutes::default())
    }

    /// The application routes with `routes.login` as the login page.
    /// `routes.home` gets an open route unless another route already
    /// covers it.
    pub fn application_with(routes: &GuardRoutes) -> Self {
        let mut table = Self::new()
            .with(Route::new("/"))
            .with(Route::new("/home"))
            .with(Route::new(routes.login.as_str()).guarded(Guard::RequireAnonymous))
            .with(Route::new("/auth/signup").guarded(Guard::RequireAnonymous))
            .with(Route::new("/auth/forgot").guarded(Guard::RequireAnonymous))
            .with(Route::new("/profile").guarded(Guard::RequireAuthenticated))
            .with(Route::new("/events"))
            .with(Route::new("/events/:id"));

        table = table.with(Route::redirect("/admin", "/admin/events"));
        for section in ["events", "promoters", "consumers", "admins"] {
            for suffix in ["", "/new", "/:id"] {
                table = table.with(role_route(
                    format!("/admin/{section}{suffix}"),
                    Role::Admin,
                ));
            }
        }

        table = table.with(Route::redirect("/promoter", "/promoter/events"));
        for suffix in ["", "/new", "/:id"] {
            table = table.with(role_route(
                format!("/promoter/events{suffix}"),
                Role::Promoter,
            ));
        }

        if table.resolve(&routes.home).is_none() {
            table = table.with(Route::new(routes.home.as_str()));
        }

        table
            .with(Route::new(NOT_FOUND_ROUTE).not_found())
            .with(Route::redirect("**", NOT_FOUND_ROUTE))
    }
}

fn role_route(pattern: String, role: Role) -> Route {
    Route::new(pattern)
        .guarded(Guard::RequireAuthenticated)
        .guarded(Guard::RequireRole(role))
}
