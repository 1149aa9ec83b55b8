// ABOUTME: The environment a deployment acts on.
// ABOUTME: Pairs a workspace ID with an environment ID and builds their API paths.

use std::fmt;

use super::{EnvironmentId, WorkspaceId};

/// A Fabric environment addressed by workspace and environment ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub workspace: WorkspaceId,
    pub environment: EnvironmentId,
}

impl Target {
    pub fn new(workspace: WorkspaceId, environment: EnvironmentId) -> Self {
        Self {
            workspace,
            environment,
        }
    }

    /// `workspaces/{ws}/environments/{env}`
    pub fn environment_path(&self) -> String {
        format!(
            "workspaces/{}/environments/{}",
            self.workspace, self.environment
        )
    }

    /// `workspaces/{ws}/environments/{env}/staging`
    pub fn staging_path(&self) -> String {
        format!("{}/staging", self.environment_path())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.environment)
    }
}
