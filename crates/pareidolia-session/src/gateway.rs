//! The gateway: every outgoing request goes through here.
//!
//! It does two things to failed responses:
//!
//! 1. A 401 means the backend no longer accepts our token. The gateway
//!    logs the session out and asks the [`Navigator`] to go to the login
//!    route, then returns the error anyway.
//! 2. Every failure status is rewritten into an [`ErrorResponse`], so
//!    callers match on one shape no matter which endpoint failed.

use std::sync::Arc;

use pareidolia_model::{Codec, ErrorResponse, JsonCodec};
use pareidolia_transport::{ApiRequest, ApiResponse, HttpTransport};
use serde::de::DeserializeOwned;

use crate::{SessionError, SessionHandle};

/// Something that can move the user to another route.
///
/// The router implements this. Requests are fire-and-forget: the gateway
/// doesn't wait for the navigation to finish.
pub trait Navigator: Send + Sync + 'static {
    fn request_navigation(&self, path: &str);
}

/// Wraps a transport with session-aware error handling.
pub struct Gateway<T> {
    transport: T,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    codec: JsonCodec,
}

impl<T> std::fmt::Debug for Gateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> Gateway<T> {
    pub fn new(
        transport: T,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
        login_route: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            login_route: login_route.into(),
            codec: JsonCodec,
        }
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Sends a request and returns the response if its status is 2xx.
    ///
    /// # Errors
    /// - [`SessionError::Transport`] — no response arrived
    /// - [`SessionError::Rejected`] — any non-2xx status, normalized. On a
    ///   401 the session has already been logged out and navigation to
    ///   the login route requested by the time this returns.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        let id = request.id();
        let method = request.method();
        let url = request.url().to_string();

        let response = self.transport.execute(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        if response.is_unauthorized() {
            tracing::warn!(%id, %method, %url, "request unauthorized, ending session");
            self.session.logout();
            self.navigator.request_navigation(&self.login_route);
        } else {
            tracing::debug!(%id, %method, %url, status = response.status(), "request rejected");
        }

        Err(SessionError::Rejected(normalize_error(&response)))
    }

    /// Sends a request and decodes the success body.
    pub async fn send_json<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<R, SessionError> {
        let response = self.send(request).await?;
        Ok(self.codec.decode(response.body())?)
    }

    /// Sends a request whose success body is irrelevant.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), SessionError> {
        self.send(request).await.map(|_| ())
    }
}

/// Rewrites a failed response into the normalized error payload.
///
/// A body already in `{timestamp, status, message}` shape is kept, with
/// the response status filled in if the body omitted it. Anything else
/// becomes a payload carrying the status and the trimmed body text, or a
/// generic message when the body is empty.
pub fn normalize_error(response: &ApiResponse) -> ErrorResponse {
    let status = response.status();

    if let Ok(mut payload) = JsonCodec.decode::<ErrorResponse>(response.body()) {
        payload.status.get_or_insert(status);
        return payload;
    }

    let text = response.text();
    let text = text.trim();
    if text.is_empty() {
        ErrorResponse::new(status, format!("request failed with status {status}"))
    } else {
        ErrorResponse::new(status, text)
    }
}
