// ABOUTME: Deploy command implementation.
// ABOUTME: Validates the artifact locally, connects, and runs the publish lifecycle.

use super::connection::connect;
use fabdeploy::config::Config;
use fabdeploy::error::Result;
use fabdeploy::fabric::FabricError;
use fabdeploy::output::Output;
use fabdeploy::publish::Publisher;

/// Replace the environment's custom library and publish it.
pub async fn deploy(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let target = config.target().clone();

    // Fail on a bad path before the token request.
    let metadata = tokio::fs::metadata(&config.artifact)
        .await
        .map_err(|source| FabricError::Artifact {
            path: config.artifact.clone(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(FabricError::NotAFile(config.artifact.clone()).into());
    }

    output.progress(&format!(
        "Deploying {} to environment {} (workspace {})",
        config.artifact.display(),
        target.environment,
        target.workspace
    ));

    let client = connect(&config.connection, &output).await?;
    let publisher = Publisher::new(client, config.connection.settings.publish);

    output.progress("  → Running publish lifecycle...");
    let report = publisher.run_deployment(&target, &config.artifact).await?;

    if let Some(state) = &report.cancelled_prior {
        output.warning(&format!(
            "cancelled an earlier publish of environment {} that was {state}",
            target.environment
        ));
    }
    for name in &report.removed {
        output.progress(&format!("  → Removed {name}"));
    }
    output.progress(&format!(
        "  ✓ Uploaded and published {} ({} bytes)",
        report.uploaded, report.uploaded_bytes
    ));

    output.data("deployment", &report);
    output.success("Deployment complete!");
    Ok(())
}
