//! The network seam.
//!
//! [`Transport`] is the only place the pipeline touches I/O. The executor
//! hands it a finished [`OperationRequest`] and gets back either the raw
//! response (status, content type, body) or a [`TransportError`].

use crate::config::ClientConfig;
use crate::error::{EdudocError, TransportError};
use crate::operation::Method;
use crate::pipeline::envelope::OperationRequest;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// An HTTP response as seen by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `true` when the server declared a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or("").trim())
            .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
    }
}

/// Sends one envelope and returns the raw response. Single attempt; no
/// retries happen at this layer or above it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OperationRequest) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport talking to the real service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, EdudocError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        // No timeout unless asked for; the transport default applies otherwise.
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| EdudocError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, endpoint: &str) -> Result<reqwest::Url, TransportError> {
        let joined = format!("{}{}", self.base_url, endpoint);
        reqwest::Url::parse(&joined).map_err(|e| TransportError::Build {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OperationRequest) -> Result<RawResponse, TransportError> {
        let operation = request.operation();
        let endpoint = operation.endpoint();
        let url = self.url_for(endpoint)?;

        let builder = match operation.method() {
            Method::Post => self.client.post(url).multipart(multipart_form(request)?),
            Method::Get => self.client.get(url).query(request.fields()),
            Method::Delete => self.client.delete(url).query(request.fields()),
        };

        debug!("{:?} {}", operation.method(), endpoint);
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        debug!("{} → HTTP {} ({} bytes)", endpoint, status, body.len());
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Multipart body: attachments first, then scalar fields, each group in
/// insertion order.
fn multipart_form(request: &OperationRequest) -> Result<Form, TransportError> {
    let mut form = Form::new();

    for attachment in request.attachments() {
        let artifact = &attachment.artifact;
        let part = Part::stream_with_length(artifact.content().clone(), artifact.len())
            .file_name(artifact.name().to_string())
            .mime_str(&artifact.mime_type())
            .map_err(|e| TransportError::Build {
                endpoint: request.operation().endpoint().to_string(),
                detail: e.to_string(),
            })?;
        form = form.part(attachment.field.clone(), part);
    }

    for (name, value) in request.fields() {
        form = form.text(name.clone(), value.clone());
    }

    Ok(form)
}
