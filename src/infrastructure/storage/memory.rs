use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::{unique_file_name, MediaError, MediaStore};
use crate::common::form::UploadedFile;

/// Keeps uploads in memory. Used in tests in place of a real disk or bucket.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    files: Mutex<HashMap<String, Bytes>>,
    fail: bool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails.
    pub fn failing() -> Self {
        Self {
            files: Mutex::default(),
            fail: true,
        }
    }

    pub async fn get(&self, path: &str) -> Option<Bytes> {
        self.files.lock().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.lock().await.is_empty()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn store(&self, file: &UploadedFile) -> Result<String, MediaError> {
        if self.fail {
            return Err(MediaError::Upload("failed to store movie file".to_string()));
        }

        let path = format!("memory/{}", unique_file_name(&file.file_name));
        self.files.lock().await.insert(path.clone(), file.data.clone());
        Ok(path)
    }
}
