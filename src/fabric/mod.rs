// ABOUTME: Fabric REST API access: transport, retrying client, typed operations.
// ABOUTME: Everything that talks HTTP to api.fabric.microsoft.com lives here.

mod artifact;
mod client;
mod error;
mod operations;
mod transport;
mod types;

pub use artifact::Artifact;
pub use client::{DEFAULT_API_BASE, FabricClient, RetryPolicy};
pub use error::FabricError;
pub use operations::{UPLOAD_CONTENT_TYPE, UPLOAD_FIELD, encode_library_name};
pub use transport::{ApiRequest, ApiResponse, FilePart, HttpTransport, RequestBody, Transport};
pub use types::{
    CustomLibraries, EnvironmentDetails, EnvironmentProperties, EnvironmentState, LibraryListing,
    PublishDetails, PublishState,
};
