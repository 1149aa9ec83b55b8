// ABOUTME: Run configuration for fabdeploy.
// ABOUTME: Resolves required inputs from CLI flags and FABRIC_* variables, plus the settings file.

mod credentials;
mod init;
mod settings;

pub use credentials::Credentials;
pub use init::init_settings;
pub use settings::{SETTINGS_FILENAME, SETTINGS_FILENAME_ALT, SETTINGS_FILENAME_DIR, Settings};

use crate::error::{Error, Result};
use crate::types::{EnvironmentId, Target, WorkspaceId};
use std::path::{Path, PathBuf};

pub const ENV_CLIENT_ID: &str = "FABRIC_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "FABRIC_CLIENT_SECRET";
pub const ENV_TENANT_ID: &str = "FABRIC_TENANT_ID";
pub const ENV_WORKSPACE_ID: &str = "FABRIC_WORKSPACE_ID";
pub const ENV_ENVIRONMENT_ID: &str = "FABRIC_ENVIRONMENT_ID";
pub const ENV_FILE_PATH: &str = "FABRIC_FILE_PATH";

/// Values given on the command line. Each one overrides its variable.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
    pub workspace_id: Option<String>,
    pub environment_id: Option<String>,
    pub file_path: Option<PathBuf>,
}

/// Everything needed to talk to one environment.
#[derive(Debug, Clone)]
pub struct Connection {
    pub credentials: Credentials,
    pub target: Target,
    pub settings: Settings,
}

/// Everything needed for a deployment run.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: Connection,
    pub artifact: PathBuf,
}

/// Collects values and remembers which required ones are missing.
struct Resolver<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F: Fn(&str) -> Option<String>> Resolver<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    /// Flag value if set, otherwise the variable. Blank values count as missing.
    fn take(&mut self, flag: Option<&str>, var: &'static str) -> Option<String> {
        let value = flag
            .map(str::to_string)
            .or_else(|| (self.lookup)(var))
            .filter(|v| !v.trim().is_empty());
        if value.is_none() {
            self.missing.push(var);
        }
        value
    }

    /// Like `take`, but a flag path is kept as given, including non-UTF-8
    /// bytes. A blank flag falls back to the variable.
    fn take_path(&mut self, flag: Option<&Path>, var: &'static str) -> Option<PathBuf> {
        match flag.filter(|p| !p.to_string_lossy().trim().is_empty()) {
            Some(path) => Some(path.to_path_buf()),
            None => self.take(None, var).map(PathBuf::from),
        }
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingConfig(self.missing))
        }
    }
}

fn connection_values<F: Fn(&str) -> Option<String>>(
    inputs: &Inputs,
    resolver: &mut Resolver<F>,
) -> [Option<String>; 5] {
    [
        resolver.take(inputs.client_id.as_deref(), ENV_CLIENT_ID),
        resolver.take(inputs.client_secret.as_deref(), ENV_CLIENT_SECRET),
        resolver.take(inputs.tenant_id.as_deref(), ENV_TENANT_ID),
        resolver.take(inputs.workspace_id.as_deref(), ENV_WORKSPACE_ID),
        resolver.take(inputs.environment_id.as_deref(), ENV_ENVIRONMENT_ID),
    ]
}

fn build_connection(values: [Option<String>; 5], settings: Settings) -> Result<Connection> {
    let [client_id, client_secret, tenant_id, workspace_id, environment_id] =
        values.map(Option::unwrap_or_default);

    let workspace = WorkspaceId::parse(&workspace_id).map_err(|source| Error::InvalidId {
        name: ENV_WORKSPACE_ID,
        source,
    })?;
    let environment = EnvironmentId::parse(&environment_id).map_err(|source| Error::InvalidId {
        name: ENV_ENVIRONMENT_ID,
        source,
    })?;

    Ok(Connection {
        credentials: Credentials::new(client_id, client_secret, tenant_id),
        target: Target::new(workspace, environment),
        settings,
    })
}

impl Connection {
    /// Resolve the five connection inputs through `lookup`.
    ///
    /// All missing inputs are reported together, before any I/O.
    pub fn resolve<F>(inputs: &Inputs, lookup: F, settings: Settings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolver = Resolver::new(lookup);
        let values = connection_values(inputs, &mut resolver);
        resolver.finish()?;
        build_connection(values, settings)
    }

    /// Resolve from the process environment.
    pub fn from_env(inputs: &Inputs, settings: Settings) -> Result<Self> {
        Self::resolve(inputs, |var| std::env::var(var).ok(), settings)
    }
}

impl Config {
    /// Resolve all six deployment inputs through `lookup`.
    ///
    /// All missing inputs are reported together, before any I/O.
    pub fn resolve<F>(inputs: &Inputs, lookup: F, settings: Settings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolver = Resolver::new(lookup);
        let values = connection_values(inputs, &mut resolver);
        let artifact = resolver.take_path(inputs.file_path.as_deref(), ENV_FILE_PATH);
        resolver.finish()?;

        Ok(Config {
            connection: build_connection(values, settings)?,
            artifact: artifact.unwrap_or_default(),
        })
    }

    /// Resolve from the process environment.
    pub fn from_env(inputs: &Inputs, settings: Settings) -> Result<Self> {
        Self::resolve(inputs, |var| std::env::var(var).ok(), settings)
    }

    pub fn target(&self) -> &Target {
        &self.connection.target
    }
}
