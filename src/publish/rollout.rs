// ABOUTME: Library rollout parameterized by state marker.
// ABOUTME: Each transition consumes self, performs one API step, and returns the next state.

use tokio::time::Instant;

use super::error::PublishError;
use super::lifecycle::Publisher;
use super::report::DeploymentReport;
use super::state::{Cleared, Pending, Published, Publishing, Quiesced, Staged};
use crate::fabric::{Artifact, PublishState, Transport};
use crate::types::Target;

/// A library rollout in progress against one environment.
///
/// The state parameter `S` only allows the next step in the sequence to be
/// called, so the cancel, clean, upload, publish, wait order cannot be
/// skipped or reordered.
#[derive(Debug)]
pub struct Rollout<'a, T, S> {
    publisher: &'a Publisher<T>,
    target: &'a Target,
    artifact: Artifact,
    report: DeploymentReport,
    started: Instant,
    #[allow(dead_code)]
    state: S,
}

impl<'a, T, S> Rollout<'a, T, S> {
    fn transition<N>(self, state: N) -> Rollout<'a, T, N> {
        Rollout {
            publisher: self.publisher,
            target: self.target,
            artifact: self.artifact,
            report: self.report,
            started: self.started,
            state,
        }
    }
}

impl<'a, T: Transport> Rollout<'a, T, Pending> {
    pub fn new(publisher: &'a Publisher<T>, target: &'a Target, artifact: Artifact) -> Self {
        Rollout {
            publisher,
            target,
            artifact,
            report: DeploymentReport::default(),
            started: Instant::now(),
            state: Pending,
        }
    }

    /// Make sure no publish is in flight.
    ///
    /// If the environment is not in `Success`, the staged publish is
    /// cancelled and the cancellation is awaited, accepting `Cancelled` as
    /// a finished state.
    #[must_use = "rollout state must be used"]
    pub async fn quiesce(mut self) -> Result<Rollout<'a, T, Quiesced>, PublishError> {
        let client = self.publisher.client();
        let state = client.get_environment_state(self.target).await?;

        if state != PublishState::Success {
            tracing::info!("Cancelling earlier publish (state: {state})...");
            client.cancel_publish(self.target).await?;
            self.publisher
                .wait_until_publish_finished(self.target, true, self.publisher.settings().timeout)
                .await?;
            self.report.cancelled_prior = Some(state);
        }

        Ok(self.transition(Quiesced))
    }
}

impl<'a, T: Transport> Rollout<'a, T, Quiesced> {
    /// Delete all published custom libraries from staging.
    #[must_use = "rollout state must be used"]
    pub async fn clear_staging(mut self) -> Result<Rollout<'a, T, Cleared>, PublishError> {
        let removed = self
            .publisher
            .client()
            .delete_all_published_custom_libraries(self.target)
            .await?;
        if !removed.is_empty() {
            tracing::info!("Removed {} library file(s) from staging", removed.len());
        }
        self.report.removed = removed;
        Ok(self.transition(Cleared))
    }
}

impl<'a, T: Transport> Rollout<'a, T, Cleared> {
    /// Upload the new artifact to staging.
    #[must_use = "rollout state must be used"]
    pub async fn upload(mut self) -> Result<Rollout<'a, T, Staged>, PublishError> {
        self.publisher
            .client()
            .upload_artifact(self.target, &self.artifact)
            .await?;
        self.report.uploaded = self.artifact.file_name().to_string();
        self.report.uploaded_bytes = self.artifact.len();
        Ok(self.transition(Staged))
    }
}

impl<'a, T: Transport> Rollout<'a, T, Staged> {
    /// Trigger the publish of staging.
    #[must_use = "rollout state must be used"]
    pub async fn publish(self) -> Result<Rollout<'a, T, Publishing>, PublishError> {
        self.publisher.client().trigger_publish(self.target).await?;
        Ok(self.transition(Publishing))
    }
}

impl<'a, T: Transport> Rollout<'a, T, Publishing> {
    /// Poll until the publish succeeds. A cancellation now counts as failure.
    #[must_use = "rollout state must be used"]
    pub async fn wait(self) -> Result<Rollout<'a, T, Published>, PublishError> {
        self.publisher
            .wait_until_publish_finished(self.target, false, self.publisher.settings().timeout)
            .await?;
        Ok(self.transition(Published))
    }
}

impl<T> Rollout<'_, T, Published> {
    /// Consume the rollout and return its report.
    pub fn finish(mut self) -> DeploymentReport {
        self.report.elapsed = self.started.elapsed();
        self.report
    }
}
