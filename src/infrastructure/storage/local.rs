use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::{unique_file_name, MediaError, MediaStore};
use crate::common::form::UploadedFile;

/// Writes uploads to a directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    base_path: PathBuf,
}

impl LocalMediaStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, file: &UploadedFile) -> Result<String, MediaError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(MediaError::io("failed to create directory"))?;

        let path = self.base_path.join(unique_file_name(&file.file_name));

        let mut dst = fs::File::create(&path)
            .await
            .map_err(MediaError::io("failed to create file"))?;
        dst.write_all(&file.data)
            .await
            .map_err(MediaError::io("failed to write file"))?;
        dst.flush()
            .await
            .map_err(MediaError::io("failed to write file"))?;

        info!(path = %path.display(), bytes = file.data.len(), "stored movie file");
        Ok(path.to_string_lossy().into_owned())
    }
}
