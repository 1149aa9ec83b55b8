// ABOUTME: Bearer token acquisition for the Fabric API.
// ABOUTME: Client-credential flow against Microsoft Entra ID behind a TokenProvider trait.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

use crate::config::Credentials;

/// OAuth scope granting access to the Fabric REST API.
pub const FABRIC_SCOPE: &str = "https://api.fabric.microsoft.com/.default";

/// Default Entra ID authority host.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// An opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Errors from token acquisition.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token request rejected with status {status}: {error}: {description}")]
    Rejected {
        status: u16,
        error: String,
        description: String,
    },

    #[error("unexpected token response: {0}")]
    Malformed(String),
}

/// Something that can hand out a bearer token for the Fabric API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<AccessToken, AuthError>;
}

/// Client-credential flow using an application's client secret.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

impl ClientSecretCredential {
    pub fn new(credentials: Credentials) -> Result<Self, AuthError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            authority: DEFAULT_AUTHORITY.to_string(),
            credentials,
        })
    }

    /// Use a different authority host (sovereign clouds, tests).
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// The tenant is percent-encoded so it stays a single path segment.
    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            urlencoding::encode(&self.credentials.tenant_id)
        )
    }
}

#[async_trait]
impl TokenProvider for ClientSecretCredential {
    async fn token(&self) -> Result<AccessToken, AuthError> {
        let url = self.token_url();
        tracing::debug!(url = %url, client_id = %self.credentials.client_id, "requesting access token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret()),
            ("scope", FABRIC_SCOPE),
        ];
        let response = self.http.post(&url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed: TokenErrorResponse =
                serde_json::from_str(&body).unwrap_or(TokenErrorResponse {
                    error: "unknown_error".to_string(),
                    error_description: body,
                });
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                error: parsed.error,
                description: parsed.error_description,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Malformed(e.to_string()))?;
        Ok(AccessToken(parsed.access_token))
    }
}
