// ABOUTME: Authenticated Fabric API client with bounded retry.
// ABOUTME: Joins paths onto the API base, applies default headers, decodes JSON once.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::error::FabricError;
use super::transport::{ApiRequest, RequestBody, Transport};
use crate::auth::AccessToken;

/// Base URL of the Fabric REST API.
pub const DEFAULT_API_BASE: &str = "https://api.fabric.microsoft.com/";

/// How many attempts a request gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

/// Client for the Fabric environment endpoints.
///
/// Every request is sent with the bearer token this client was built with.
/// Non-200 responses are retried with a fixed delay; the first 200 response
/// is decoded and returned.
pub struct FabricClient<T> {
    transport: T,
    base_url: String,
    token: AccessToken,
    retry: RetryPolicy,
}

impl<T> std::fmt::Debug for FabricClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FabricClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl<T: Transport> FabricClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            token,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `Authorization: Bearer <token>` on its own.
    pub fn auth_headers(&self) -> Result<HeaderMap, FabricError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token.secret()))
            .map_err(|_| FabricError::InvalidToken)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// JSON content type plus bearer authorization.
    pub fn default_headers(&self) -> Result<HeaderMap, FabricError> {
        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send a request, retrying non-200 responses.
    ///
    /// `headers` replaces the default header set when given. The response
    /// body of the first 200 is decoded as JSON; an empty body decodes to
    /// `null`.
    ///
    /// # Errors
    ///
    /// - `FabricError::Api` once every attempt answered non-200.
    /// - `FabricError::MalformedResponse` if a 200 body is not JSON.
    /// - `FabricError::Http` if the transport itself fails (not retried).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<Value, FabricError> {
        let headers = match headers {
            Some(headers) => headers,
            None => self.default_headers()?,
        };
        let request = ApiRequest {
            method,
            url: self.endpoint(path),
            headers,
            body,
        };

        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            tracing::debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let response = self.transport.send(&request).await?;

            if response.is_ok() {
                return decode_body(&request.url, &response.body);
            }

            if attempt >= max_attempts {
                return Err(FabricError::Api {
                    status: response.status,
                    body: response.body,
                    url: request.url,
                    attempts: attempt,
                });
            }

            tracing::warn!(
                "Request failed (attempt {attempt}, status {}), retrying in {} seconds...",
                response.status,
                self.retry.delay.as_secs_f64()
            );
            tokio::time::sleep(self.retry.delay).await;
            attempt += 1;
        }
    }

    /// `request` with default headers and no body, decoded into `R`.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<R, FabricError> {
        let url = self.endpoint(path);
        let value = self.request(method, path, RequestBody::Empty, None).await?;
        serde_json::from_value(value).map_err(|e| FabricError::MalformedResponse {
            url,
            reason: e.to_string(),
        })
    }
}

fn decode_body(url: &str, body: &str) -> Result<Value, FabricError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| FabricError::MalformedResponse {
        url: url.to_string(),
        reason: format!("body is not JSON: {e}"),
    })
}
