// ABOUTME: Typed Fabric environment operations built on the retrying client.
// ABOUTME: State reads, library listing/deletion/upload, and publish cancel/trigger.

use reqwest::Method;
use std::path::Path;

use super::artifact::Artifact;
use super::client::FabricClient;
use super::error::FabricError;
use super::transport::{FilePart, RequestBody, Transport};
use super::types::{EnvironmentDetails, EnvironmentState, LibraryListing, PublishState};
use crate::types::Target;

/// Multipart field the staging upload endpoint expects.
pub const UPLOAD_FIELD: &str = "file";

/// Content type sent for uploaded library files.
pub const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Percent-encode a library name for use in a query string.
///
/// RFC 3986 unreserved characters are kept; everything else, including
/// `/` and space, is encoded.
pub fn encode_library_name(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

impl<T: Transport> FabricClient<T> {
    /// Environment description for display. Unexpected field shapes read as `None`.
    pub async fn get_environment_details(
        &self,
        target: &Target,
    ) -> Result<EnvironmentDetails, FabricError> {
        self.request_as(Method::GET, &target.environment_path())
            .await
    }

    /// Current `properties.publishDetails.state` of the environment.
    ///
    /// # Errors
    ///
    /// `FabricError::MalformedResponse` if the response has no state.
    /// Other fields of the body are not read.
    pub async fn get_environment_state(&self, target: &Target) -> Result<PublishState, FabricError> {
        let path = target.environment_path();
        let state: EnvironmentState = self.request_as(Method::GET, &path).await?;
        state
            .into_publish_state()
            .ok_or_else(|| FabricError::MalformedResponse {
                url: self.endpoint(&path),
                reason: "missing properties.publishDetails.state".to_string(),
            })
    }

    /// Custom libraries currently published in the environment.
    pub async fn list_custom_libraries(&self, target: &Target) -> Result<LibraryListing, FabricError> {
        self.request_as(
            Method::GET,
            &format!("{}/libraries", target.environment_path()),
        )
        .await
    }

    /// Remove one library from the staging area.
    pub async fn delete_custom_library(&self, target: &Target, name: &str) -> Result<(), FabricError> {
        let path = format!(
            "{}/libraries?libraryToDelete={}",
            target.staging_path(),
            encode_library_name(name)
        );
        self.request(Method::DELETE, &path, RequestBody::Empty, None)
            .await?;
        tracing::debug!(library = name, environment = %target.environment, "deleted staged library");
        Ok(())
    }

    /// Upload the file at `path` to the staging area.
    ///
    /// The file is read before any request is made.
    pub async fn upload_custom_library(&self, target: &Target, path: &Path) -> Result<(), FabricError> {
        let artifact = Artifact::load(path).await?;
        self.upload_artifact(target, &artifact).await
    }

    /// Upload an already loaded artifact to the staging area.
    pub async fn upload_artifact(&self, target: &Target, artifact: &Artifact) -> Result<(), FabricError> {
        let body = RequestBody::Multipart(FilePart {
            field: UPLOAD_FIELD.to_string(),
            file_name: artifact.file_name().to_string(),
            content_type: UPLOAD_CONTENT_TYPE.to_string(),
            content: artifact.content().clone(),
        });
        // Explicit headers: the multipart boundary content type must not be
        // overridden by the JSON default.
        let headers = self.auth_headers()?;
        self.request(
            Method::POST,
            &format!("{}/libraries", target.staging_path()),
            body,
            Some(headers),
        )
        .await?;
        tracing::info!(
            file = artifact.file_name(),
            bytes = artifact.len(),
            "uploaded custom library"
        );
        Ok(())
    }

    /// Delete every published wheel from the staging area.
    ///
    /// Returns the names deleted, in listing order. A listing without
    /// `customLibraries.wheelFiles` deletes nothing.
    pub async fn delete_all_published_custom_libraries(
        &self,
        target: &Target,
    ) -> Result<Vec<String>, FabricError> {
        let listing = self.list_custom_libraries(target).await?;
        let names = listing.wheel_files().to_vec();
        for name in &names {
            self.delete_custom_library(target, name).await?;
        }
        Ok(names)
    }

    /// Ask Fabric to cancel the staged publish.
    pub async fn cancel_publish(&self, target: &Target) -> Result<(), FabricError> {
        self.request(
            Method::POST,
            &format!("{}/cancelPublish", target.staging_path()),
            RequestBody::Empty,
            None,
        )
        .await?;
        Ok(())
    }

    /// Start publishing the staging area.
    pub async fn trigger_publish(&self, target: &Target) -> Result<(), FabricError> {
        self.request(
            Method::POST,
            &format!("{}/publish", target.staging_path()),
            RequestBody::Empty,
            None,
        )
        .await?;
        tracing::info!("Environment {} published successfully", target.environment);
        Ok(())
    }
}
