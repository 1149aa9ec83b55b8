// ABOUTME: Summary of a finished deployment.
// ABOUTME: Records what was cancelled, removed, and uploaded, and how long it took.

use serde::Serialize;
use std::time::Duration;

use crate::fabric::PublishState;

/// What a successful `run_deployment` did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    /// State of the earlier publish that had to be cancelled, if any.
    #[serde(serialize_with = "serialize_state")]
    pub cancelled_prior: Option<PublishState>,
    /// Library names removed from staging before upload.
    pub removed: Vec<String>,
    /// File name of the uploaded artifact.
    pub uploaded: String,
    /// Size of the uploaded artifact in bytes.
    pub uploaded_bytes: usize,
    /// Wall-clock duration of the whole run.
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_state<S: serde::Serializer>(
    state: &Option<PublishState>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match state {
        Some(state) => serializer.serialize_some(state.as_str()),
        None => serializer.serialize_none(),
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}
