// ABOUTME: Error types for Fabric REST API calls.
// ABOUTME: Distinguishes API failures, unexpected response shapes, transport and artifact errors.

use std::path::PathBuf;

/// Errors from the Fabric transport and resource operations.
#[derive(Debug, thiserror::Error)]
pub enum FabricError {
    /// The API answered with a non-200 status on every attempt.
    #[error(
        "Fabric API request failed after {attempts} attempt(s) with status code {status}: {body}. URL: {url}"
    )]
    Api {
        status: u16,
        body: String,
        url: String,
        attempts: u32,
    },

    /// The API answered 200 but the body did not have the expected shape.
    #[error("unexpected API response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// The request never produced an HTTP response.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The local artifact could not be opened or read.
    #[error("failed to read artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("access token contains characters not allowed in an HTTP header")]
    InvalidToken,
}

impl FabricError {
    /// HTTP status code of the final attempt, if the API responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FabricError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the error happened locally before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            FabricError::Artifact { .. } | FabricError::NotAFile(_) | FabricError::InvalidToken
        )
    }
}
