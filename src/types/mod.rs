// ABOUTME: Type-safe identifiers for Fabric resources.
// ABOUTME: Uses phantom types to prevent workspace/environment ID confusion at compile time.

mod id;
mod target;

pub use id::{EnvironmentId, IdError, WorkspaceId};
pub use target::Target;
