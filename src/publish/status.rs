// ABOUTME: Classification of remote publish states for the polling loop.
// ABOUTME: Maps PublishState onto finished, in-progress, or failed outcomes.

use crate::fabric::PublishState;

/// What a publish state means to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Success,
    Failed,
    Cancelled,
    InProgress,
}

impl PublishStatus {
    pub fn of(state: &PublishState) -> Self {
        match state {
            PublishState::Success => PublishStatus::Success,
            PublishState::Failed => PublishStatus::Failed,
            PublishState::Cancelled => PublishStatus::Cancelled,
            _ => PublishStatus::InProgress,
        }
    }

    /// Resolve to `Some(true)` when polling can stop, `Some(false)` to keep
    /// polling, or `None` when the state is a failure.
    ///
    /// `Cancelled` only counts as finished when `allow_cancelled` is set.
    pub fn resolve(self, allow_cancelled: bool) -> Option<bool> {
        match self {
            PublishStatus::Success => Some(true),
            PublishStatus::Cancelled if allow_cancelled => Some(true),
            PublishStatus::Cancelled | PublishStatus::Failed => None,
            PublishStatus::InProgress => Some(false),
        }
    }
}
