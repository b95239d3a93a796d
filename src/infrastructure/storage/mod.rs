use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::common::form::UploadedFile;

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalMediaStore;
pub use memory::InMemoryMediaStore;
pub use s3::S3MediaStore;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Upload(String),
}

impl MediaError {
    pub fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Io { context, source }
    }
}

/// Durable home for uploaded movie files.
///
/// Implementations choose the stored name themselves; two calls never share a path.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, file: &UploadedFile) -> Result<String, MediaError>;
}

/// `<uuid>-<name>`, where `name` is the last path component of the client's file name.
pub fn unique_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload");

    format!("{}-{}", Uuid::new_v4().simple(), base)
}
