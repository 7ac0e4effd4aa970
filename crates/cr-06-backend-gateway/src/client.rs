//! Shared HTTP plumbing.

use crate::config::GatewayConfig;
use reqwest::multipart::Part;
use reqwest::{Client, RequestBuilder, Response, Url};
use shared_types::{GatewayError, Upload};
use tracing::debug;

/// HTTP client for the registrar backend.
///
/// Cheap to share behind an `Arc`; the cookie jar is per client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    pub(crate) http: Client,
    config: GatewayConfig,
}

impl BackendClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// `path` followed by one percent-encoded segment, e.g. a certificate id.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.url(path)).map_err(|e| {
            GatewayError::Transport(format!("Invalid backend URL {}: {e}", self.config.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::Transport(format!(
                    "Backend URL {} cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = self.dispatch(request).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Send a request and return the raw successful response.
    pub(crate) async fn dispatch(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        handle_response(response).await
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_connect() {
            GatewayError::Transport(format!("Cannot connect to {}", self.config.base_url))
        } else if err.is_timeout() {
            GatewayError::Transport(format!("Request timed out: {err}"))
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Map non-success responses through the backend's error body.
async fn handle_response(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    debug!(url = %response.url(), status = status.as_u16(), "Backend responded");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::from_error_body(status.as_u16(), &body))
}

/// Multipart part for an uploaded file.
pub(crate) fn file_part(file: Upload) -> Result<Part, GatewayError> {
    let Upload {
        file_name,
        content_type,
        bytes,
    } = file;
    let part = Part::bytes(bytes).file_name(file_name);
    if content_type.trim().is_empty() {
        return Ok(part);
    }
    part.mime_str(&content_type)
        .map_err(|_| GatewayError::Rejected {
            status: 400,
            message: format!("Unsupported content type: {content_type}"),
        })
}
