// ABOUTME: HTTP transport seam for the Fabric REST API.
// ABOUTME: Defines the Transport trait and its reqwest-backed implementation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use std::time::Duration;

use super::error::FabricError;

/// A fully resolved API request: absolute URL, final headers and body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// Request payload.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// A single file sent as `multipart/form-data`.
    Multipart(FilePart),
}

/// One file field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Raw response as seen by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Sends a single HTTP request. Retry policy lives above this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, FabricError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, FabricError> {
        (**self).send(request).await
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Per-request timeout. Uploads of large wheels are the slowest call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, FabricError> {
        let http_err = |source: reqwest::Error| FabricError::Http {
            url: request.url.clone(),
            source,
        };

        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let RequestBody::Multipart(part) = &request.body {
            let file = Part::bytes(part.content.to_vec())
                .file_name(part.file_name.clone())
                .mime_str(&part.content_type)
                .map_err(http_err)?;
            builder = builder.multipart(Form::new().part(part.field.clone(), file));
        }

        let response = builder.send().await.map_err(http_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(http_err)?;

        Ok(ApiResponse { status, body })
    }
}
