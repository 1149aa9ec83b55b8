// ABOUTME: Publish lifecycle orchestration for Fabric environments.
// ABOUTME: Exports the controller, rollout state markers, status mapping, and errors.

mod error;
mod lifecycle;
mod report;
mod rollout;
mod state;
mod status;

pub use error::{PublishError, PublishErrorKind};
pub use lifecycle::{PublishSettings, Publisher};
pub use report::DeploymentReport;
pub use rollout::Rollout;
pub use state::{Cleared, Pending, Published, Publishing, Quiesced, Staged};
pub use status::PublishStatus;
