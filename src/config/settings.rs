// ABOUTME: Optional tuning file for API base, publish polling, and request retry.
// ABOUTME: Parsed from YAML with humantime durations; every field has a default.

use serde::Deserialize;
use std::path::Path;

use crate::auth::DEFAULT_AUTHORITY;
use crate::error::{Error, Result};
use crate::fabric::{DEFAULT_API_BASE, RetryPolicy};
use crate::publish::PublishSettings;

pub const SETTINGS_FILENAME: &str = "fabdeploy.yml";
pub const SETTINGS_FILENAME_ALT: &str = "fabdeploy.yaml";
pub const SETTINGS_FILENAME_DIR: &str = ".fabdeploy/config.yml";

/// Tunables that are not secrets and rarely change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api_base: String,
    /// Entra ID authority host used for the token request.
    pub authority: String,
    pub publish: PublishSettings,
    pub retry: RetryPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            publish: PublishSettings::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file parses as YAML null.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load an explicitly named settings file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first settings file found in `dir`, or defaults if none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(SETTINGS_FILENAME),
            dir.join(SETTINGS_FILENAME_ALT),
            dir.join(SETTINGS_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings");
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [("api_base", &self.api_base), ("authority", &self.authority)] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.publish.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "publish.poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
