// ABOUTME: Local library artifact loaded before any network call.
// ABOUTME: Reads the wheel into memory so retried uploads resend identical bytes.

use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use super::error::FabricError;

/// A custom library file ready to upload.
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
    file_name: String,
    content: Bytes,
}

impl Artifact {
    /// Open and read the artifact at `path`.
    ///
    /// The file handle is dropped before this returns. A missing or
    /// unreadable path fails here, without touching the network.
    pub async fn load(path: &Path) -> Result<Self, FabricError> {
        let io_err = |source: std::io::Error| FabricError::Artifact {
            path: path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let metadata = file.metadata().await.map_err(io_err)?;
        if !metadata.is_file() {
            return Err(FabricError::NotAFile(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| FabricError::NotAFile(path.to_path_buf()))?;

        let mut content = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut content).await.map_err(io_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            content: Bytes::from(content),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the path, used as the multipart filename.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
