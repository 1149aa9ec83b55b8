// ABOUTME: Settings scaffolding for new projects.
// ABOUTME: Writes a fabdeploy.yml populated with the default tunables.

use std::path::Path;

use crate::error::{Error, Result};

use super::{SETTINGS_FILENAME, Settings};

/// Write a `fabdeploy.yml` with default values into `dir`.
pub fn init_settings(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(SETTINGS_FILENAME);

    if path.exists() && !force {
        return Err(Error::AlreadyExists(path));
    }

    std::fs::write(&path, generate_template_yaml(&Settings::default()))?;
    Ok(())
}

fn generate_template_yaml(settings: &Settings) -> String {
    format!(
        r#"# Credentials and target IDs are read from FABRIC_CLIENT_ID, FABRIC_CLIENT_SECRET,
# FABRIC_TENANT_ID, FABRIC_WORKSPACE_ID, FABRIC_ENVIRONMENT_ID and FABRIC_FILE_PATH.
api_base: {}
authority: {}
publish:
  timeout: {}m
  poll_interval: {}s
retry:
  max_attempts: {}
  delay: {}s
"#,
        settings.api_base,
        settings.authority,
        settings.publish.timeout.as_secs() / 60,
        settings.publish.poll_interval.as_secs(),
        settings.retry.max_attempts,
        settings.retry.delay.as_secs()
    )
}
