// ABOUTME: Publish lifecycle controller for a Fabric environment.
// ABOUTME: Single state checks, timeout-bounded polling, and the end-to-end deployment run.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;

use super::error::{FailedSnafu, PublishError, TimeoutSnafu};
use super::report::DeploymentReport;
use super::rollout::Rollout;
use super::status::PublishStatus;
use crate::fabric::{Artifact, FabricClient, Transport};
use crate::types::Target;

/// Polling budget for a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    /// Give up waiting after this long.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Delay between state checks.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(40 * 60),
            poll_interval: Duration::from_secs(30),
        }
    }
}

/// Drives the publish lifecycle of an environment through a `FabricClient`.
#[derive(Debug)]
pub struct Publisher<T> {
    client: FabricClient<T>,
    settings: PublishSettings,
}

impl<T: Transport> Publisher<T> {
    pub fn new(client: FabricClient<T>, settings: PublishSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &FabricClient<T> {
        &self.client
    }

    pub fn settings(&self) -> PublishSettings {
        self.settings
    }

    /// Check the environment's publish state once.
    ///
    /// Returns `true` for `Success` (and for `Cancelled` when
    /// `allow_cancelled` is set), `false` while the publish is in progress.
    ///
    /// # Errors
    ///
    /// `PublishError::Failed` for `Failed`, or `Cancelled` without
    /// `allow_cancelled`.
    pub async fn is_published(
        &self,
        target: &Target,
        allow_cancelled: bool,
    ) -> Result<bool, PublishError> {
        let state = self.client.get_environment_state(target).await?;
        match PublishStatus::of(&state).resolve(allow_cancelled) {
            Some(finished) => Ok(finished),
            None => FailedSnafu {
                environment: target.environment.clone(),
                state,
            }
            .fail(),
        }
    }

    /// Poll `is_published` until it returns `true` or `timeout` has elapsed.
    ///
    /// Elapsed time is measured from entry on a monotonic clock. The check
    /// always runs at least once, so a zero timeout fails on the first
    /// in-progress answer.
    ///
    /// # Errors
    ///
    /// `PublishError::Timeout` on expiry, plus anything `is_published` returns.
    pub async fn wait_until_publish_finished(
        &self,
        target: &Target,
        allow_cancelled: bool,
        timeout: Duration,
    ) -> Result<bool, PublishError> {
        let start = Instant::now();
        let interval = self.settings.poll_interval;

        loop {
            if self.is_published(target, allow_cancelled).await? {
                if allow_cancelled {
                    tracing::info!("Earlier publish of environment {} has settled.", target.environment);
                } else {
                    tracing::info!("Environment {} is published successfully.", target.environment);
                }
                return Ok(true);
            }

            if start.elapsed() >= timeout {
                return TimeoutSnafu {
                    environment: target.environment.clone(),
                    timeout,
                }
                .fail();
            }

            tracing::info!(
                "Waiting for environment to be published, checking again in {} seconds...",
                interval.as_secs()
            );
            tokio::time::sleep(interval).await;
        }
    }

    /// Replace the environment's custom library with the file at `artifact`
    /// and publish it.
    ///
    /// Steps, strictly in order: cancel any in-flight publish and wait for it
    /// to settle, delete published libraries from staging, upload the new
    /// file, trigger publish, wait for `Success`. The artifact is read before
    /// the first request. Errors are returned unchanged and left for the
    /// caller to report.
    pub async fn run_deployment(
        &self,
        target: &Target,
        artifact: &Path,
    ) -> Result<DeploymentReport, PublishError> {
        let report = self.rollout(target, artifact).await?;
        tracing::info!(
            "Deployment of {} to environment {} completed successfully.",
            artifact.display(),
            target.environment
        );
        Ok(report)
    }

    async fn rollout(&self, target: &Target, path: &Path) -> Result<DeploymentReport, PublishError> {
        let artifact = Artifact::load(path).await?;

        let rollout = Rollout::new(self, target, artifact)
            .quiesce()
            .await?
            .clear_staging()
            .await?
            .upload()
            .await?
            .publish()
            .await?
            .wait()
            .await?;

        Ok(rollout.finish())
    }
}
