// ABOUTME: Application-wide error types for fabdeploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::auth::AuthError;
use crate::fabric::FabricError;
use crate::publish::PublishError;
use crate::types::IdError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("invalid {name}: {source}")]
    InvalidId {
        name: &'static str,
        #[source]
        source: IdError,
    },

    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Fabric(#[from] FabricError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for errors detected before any network call.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingConfig(_)
                | Error::InvalidId { .. }
                | Error::ConfigNotFound(_)
                | Error::InvalidConfig(_)
                | Error::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
