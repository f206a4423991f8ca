//! The shared core of every API client.
//!
//! A [`ScopedClient`] knows one base path (`{api}/consumer`,
//! `{api}/generic/service`, ...) and whether calls under it carry the
//! session's bearer token. Every request goes through the session's
//! gateway, so 401 handling and error normalization apply everywhere.

use pareidolia_model::{Codec, PageRequest, Role};
use pareidolia_session::{SessionError, SessionStore};
use pareidolia_transport::{ApiRequest, Body, FilePart, HttpTransport, Method};
use serde::{Serialize, de::DeserializeOwned};

/// Which part of the backend a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `{api}/{role}`, authenticated.
    Role(Role),
    /// `{api}/generic/service`, the public catalogue.
    Public,
    /// `{api}/generic/access`, login and registration.
    Access,
}

impl Scope {
    pub fn path(self) -> &'static str {
        match self {
            Self::Role(role) => role.path_segment(),
            Self::Public => "generic/service",
            Self::Access => "generic/access",
        }
    }

    /// Only role scopes send the bearer token.
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Role(_))
    }
}

/// An image to upload. Sent as a multipart body with a single `image`
/// part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    fn into_part(self) -> FilePart {
        FilePart {
            field: "image".to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

/// Builds and sends requests under one [`Scope`].
pub struct ScopedClient<T> {
    store: SessionStore<T>,
    scope: Scope,
    base: String,
}

impl<T> Clone for ScopedClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            scope: self.scope,
            base: self.base.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ScopedClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedClient")
            .field("scope", &self.scope)
            .field("base", &self.base)
            .finish()
    }
}

impl<T: HttpTransport> ScopedClient<T> {
    pub fn new(store: SessionStore<T>, scope: Scope) -> Self {
        let base = format!("{}/{}", store.config().base_url(), scope.path());
        Self { store, scope, base }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn store(&self) -> &SessionStore<T> {
        &self.store
    }

    /// `{base}/{path}`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// A request to `path`, with the bearer token attached for
    /// authenticated scopes.
    ///
    /// A missing token is not an error here: the request goes out without
    /// the header and the backend's 401 ends the session.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        let request = ApiRequest::new(method, self.url(path));
        if !self.scope.is_authenticated() {
            return request;
        }
        match self.store.token() {
            Some(token) => request.bearer(&token),
            None => {
                tracing::debug!(url = %request.url(), "no token for authenticated call");
                request
            }
        }
    }

    fn json_body<B: Serialize>(&self, body: &B) -> Result<Body, SessionError> {
        let codec = self.store.gateway().codec();
        Ok(Body::Encoded {
            content_type: codec.content_type(),
            bytes: codec.encode(body)?,
        })
    }

    async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, SessionError> {
        self.store.gateway().send_json(request).await
    }

    async fn send_empty(&self, request: ApiRequest) -> Result<(), SessionError> {
        self.store.gateway().send_empty(request).await
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, SessionError> {
        self.send_json(self.request(Method::Get, path)).await
    }

    /// GET with `page`/`size` parameters plus any extra ones.
    pub async fn get_page<R: DeserializeOwned>(
        &self,
        path: &str,
        page: PageRequest,
        extra: &[(&str, &str)],
    ) -> Result<R, SessionError> {
        let request = self
            .request(Method::Get, path)
            .queries(page.to_query())
            .queries(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self.send_json(request).await
    }

    /// POST with a JSON body.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, SessionError> {
        let request = self.request(Method::Post, path).body(self.json_body(body)?);
        self.send_json(request).await
    }

    /// POST with an empty JSON object, for action endpoints.
    pub async fn post_action<R: DeserializeOwned>(&self, path: &str) -> Result<R, SessionError> {
        let request = self.request(Method::Post, path).body(Body::Encoded {
            content_type: self.store.gateway().codec().content_type(),
            bytes: b"{}".to_vec(),
        });
        self.send_json(request).await
    }

    /// POST with a bare text body.
    pub async fn post_text<R: DeserializeOwned>(
        &self,
        path: &str,
        text: &str,
    ) -> Result<R, SessionError> {
        let request = self
            .request(Method::Post, path)
            .body(Body::Text(text.to_string()));
        self.send_json(request).await
    }

    /// POST without a body, ignoring the response body.
    pub async fn post_query(&self, path: &str, query: &[(&str, &str)]) -> Result<(), SessionError> {
        let request = self
            .request(Method::Post, path)
            .queries(query.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self.send_empty(request).await
    }

    pub async fn upload<R: DeserializeOwned>(
        &self,
        path: &str,
        image: ImageFile,
    ) -> Result<R, SessionError> {
        let request = self
            .request(Method::Post, path)
            .body(Body::Multipart(image.into_part()));
        self.send_json(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), SessionError> {
        self.send_empty(self.request(Method::Delete, path)).await
    }

    /// DELETE that returns the updated resource.
    pub async fn delete_returning<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<R, SessionError> {
        self.send_json(self.request(Method::Delete, path)).await
    }
}

/// `page` or the first page of `size`.
pub(crate) fn page_or(page: Option<PageRequest>, size: u32) -> PageRequest {
    page.unwrap_or(PageRequest::first(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_paths() {
        assert_eq!(Scope::Role(Role::Admin).path(), "admin");
        assert_eq!(Scope::Public.path(), "generic/service");
        assert_eq!(Scope::Access.path(), "generic/access");
    }

    #[test]
    fn test_scope_is_authenticated_only_for_roles() {
        assert!(Scope::Role(Role::Consumer).is_authenticated());
        assert!(!Scope::Public.is_authenticated());
        assert!(!Scope::Access.is_authenticated());
    }

    #[test]
    fn test_image_file_into_part_uses_image_field() {
        let part = ImageFile::new("a.png", "image/png", vec![1, 2]).into_part();
        assert_eq!(part.field, "image");
        assert_eq!(part.file_name, "a.png");
        assert_eq!(part.bytes, vec![1, 2]);
    }

    #[test]
    fn test_page_or_defaults_to_first_page() {
        assert_eq!(page_or(None, 20), PageRequest::new(0, 20));
        assert_eq!(
            page_or(Some(PageRequest::new(3, 5)), 20),
            PageRequest::new(3, 5)
        );
    }
}
