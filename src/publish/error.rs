// ABOUTME: Publish lifecycle error types with SNAFU pattern.
// ABOUTME: Terminal publish failures, poll timeouts, and wrapped API errors.

use snafu::Snafu;
use std::time::Duration;

use crate::fabric::{FabricError, PublishState};
use crate::types::EnvironmentId;

/// Errors from the publish lifecycle.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PublishError {
    #[snafu(display("environment {environment} failed to publish with state: {state}"))]
    Failed {
        environment: EnvironmentId,
        state: PublishState,
    },

    #[snafu(display(
        "timeout reached after {timeout:?} while waiting for environment {environment} to be published"
    ))]
    Timeout {
        environment: EnvironmentId,
        timeout: Duration,
    },

    #[snafu(display("{source}"))]
    Api { source: FabricError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishErrorKind {
    /// Remote state was Failed, or Cancelled when that was not allowed.
    PublishFailed,
    /// Polling ran out of time.
    Timeout,
    /// Retries exhausted on a non-200 response.
    Api,
    /// A 200 response did not have the expected shape.
    MalformedResponse,
    /// No HTTP response at all.
    Transport,
    /// The local artifact could not be read.
    Artifact,
}

impl PublishError {
    pub fn kind(&self) -> PublishErrorKind {
        match self {
            PublishError::Failed { .. } => PublishErrorKind::PublishFailed,
            PublishError::Timeout { .. } => PublishErrorKind::Timeout,
            PublishError::Api { source } => match source {
                FabricError::Api { .. } => PublishErrorKind::Api,
                FabricError::MalformedResponse { .. } => PublishErrorKind::MalformedResponse,
                FabricError::Http { .. } | FabricError::InvalidToken => PublishErrorKind::Transport,
                FabricError::Artifact { .. } | FabricError::NotAFile(_) => {
                    PublishErrorKind::Artifact
                }
            },
        }
    }

    /// The remote state that ended the publish, if this is a publish failure.
    pub fn failed_state(&self) -> Option<&PublishState> {
        match self {
            PublishError::Failed { state, .. } => Some(state),
            _ => None,
        }
    }
}

impl From<FabricError> for PublishError {
    fn from(source: FabricError) -> Self {
        PublishError::Api { source }
    }
}
