// ABOUTME: Status command implementation.
// ABOUTME: Shows publish state and published libraries without changing anything.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::connection::connect;
use fabdeploy::config::Connection;
use fabdeploy::error::Result;
use fabdeploy::output::Output;

#[derive(Serialize)]
struct EnvironmentStatus {
    workspace: String,
    environment: String,
    name: Option<String>,
    state: Option<String>,
    target_version: Option<String>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    wheel_files: Vec<String>,
}

/// Print the environment's publish state and wheel files.
pub async fn status(connection: Connection, output: Output) -> Result<()> {
    let target = &connection.target;
    let client = connect(&connection, &output).await?;

    let details = client.get_environment_details(target).await?;
    let libraries = client.list_custom_libraries(target).await?;
    let publish = details.publish_details().cloned().unwrap_or_default();

    let status = EnvironmentStatus {
        workspace: target.workspace.to_string(),
        environment: target.environment.to_string(),
        name: details.display_name.clone(),
        state: publish.state.as_ref().map(|s| s.to_string()),
        target_version: publish.target_version.clone(),
        start_time: publish.start_time,
        end_time: publish.end_time,
        wheel_files: libraries.wheel_files().to_vec(),
    };

    output.data("status", &status);
    output.result(&format!(
        "Environment: {} ({})",
        status.name.as_deref().unwrap_or("<unnamed>"),
        status.environment
    ));
    output.result(&format!("Workspace: {}", status.workspace));
    output.result(&format!(
        "Publish state: {}",
        status.state.as_deref().unwrap_or("unknown")
    ));
    if let Some(version) = &status.target_version {
        output.result(&format!("Target version: {version}"));
    }
    if let Some(start) = status.start_time {
        output.result(&format!("Started: {}", start.to_rfc3339()));
    }
    if let Some(end) = status.end_time {
        output.result(&format!("Finished: {}", end.to_rfc3339()));
    }
    if status.wheel_files.is_empty() {
        output.result("Wheel files: none");
    } else {
        output.result("Wheel files:");
        for name in &status.wheel_files {
            output.result(&format!("  - {name}"));
        }
    }
    Ok(())
}
