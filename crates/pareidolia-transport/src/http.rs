//! HTTP transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::{ApiRequest, ApiResponse, Body, HttpTransport, Method, TransportError};

/// A `reqwest`-based [`HttpTransport`].
///
/// `reqwest::Client` is internally reference-counted, so cloning this
/// transport is cheap and shares one connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidRequest`] when the TLS backend
    /// can't be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an already-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, TransportError> {
        let id = request.id();
        let method = request.method();
        tracing::debug!(%id, %method, url = request.url(), "sending request");

        let mut builder = self
            .client
            .request(to_reqwest_method(method), request.url());

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body_ref().clone() {
            Body::Empty => builder,
            Body::Encoded {
                content_type,
                bytes,
            } => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes),
            Body::Text(text) => builder
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(text),
            Body::Multipart(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;

        tracing::debug!(%id, status, bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_send_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::SendFailed(error.to_string())
    }
}
