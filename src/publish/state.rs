// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the cancel, clean, upload, publish, wait order.

/// Initial state: artifact loaded, environment not yet inspected.
/// Available actions: `quiesce()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// No publish in flight: staging is safe to mutate.
/// Available actions: `clear_staging()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Quiesced;

/// Previously published libraries removed from staging.
/// Available actions: `upload()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleared;

/// New artifact uploaded: staging holds exactly that one library.
/// Available actions: `publish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Staged;

/// Publish triggered.
/// Available actions: `wait()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Publishing;

/// Publish reached Success.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Published;
