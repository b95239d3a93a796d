use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::{config::BehaviorVersion, config::Credentials, config::Region, Client};
use bytes::Bytes;
use tracing::{error, info};

use super::{unique_file_name, MediaError, MediaStore};
use crate::common::form::UploadedFile;

// Minimum part size for S3 is 5MB. We use 6MB to be safe.
const MIN_PART_SIZE: usize = 6 * 1024 * 1024;

/// Movie files in an S3-compatible bucket (MinIO in development).
#[derive(Clone)]
pub struct S3MediaStore {
    client: Client,
    bucket: String,
}

impl S3MediaStore {
    pub fn new(endpoint: &str, bucket: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        info!(endpoint, bucket, "✅ Using S3 media store");

        Self {
            client: Client::from_conf(config),
            bucket: bucket.to_string(),
        }
    }

    async fn create_multipart_upload(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, MediaError> {
        let result = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| upload_error("failed to initiate upload", e))?;

        result
            .upload_id
            .ok_or_else(|| MediaError::Upload("failed to initiate upload: missing upload id".into()))
    }

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> Result<CompletedPart, MediaError> {
        let result = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| upload_error("failed to upload part", e))?;

        let e_tag = result.e_tag.ok_or_else(|| {
            MediaError::Upload(format!("failed to upload part {part_number}: missing ETag"))
        })?;

        Ok(CompletedPart::builder()
            .e_tag(e_tag)
            .part_number(part_number)
            .build())
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<String, MediaError> {
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| upload_error("failed to complete upload", e))?;

        Ok(format!("{}/{}", self.bucket, key))
    }

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) {
        let result = self
            .client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await;

        if let Err(e) = result {
            error!(key, error = %e, "failed to abort multipart upload");
        }
    }

    async fn upload_parts(
        &self,
        key: &str,
        upload_id: &str,
        data: &Bytes,
    ) -> Result<Vec<CompletedPart>, MediaError> {
        if data.is_empty() {
            return Ok(vec![self.upload_part(key, upload_id, 1, Bytes::new()).await?]);
        }

        let mut parts = Vec::new();

        for (index, chunk) in data.chunks(MIN_PART_SIZE).enumerate() {
            // Part numbers start at 1.
            let part_number = index as i32 + 1;
            let body = data.slice_ref(chunk);
            parts.push(self.upload_part(key, upload_id, part_number, body).await?);
        }

        Ok(parts)
    }
}

fn upload_error(context: &str, err: impl std::fmt::Display) -> MediaError {
    MediaError::Upload(format!("{context}: {err}"))
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn store(&self, file: &UploadedFile) -> Result<String, MediaError> {
        let key = format!("movies/{}", unique_file_name(&file.file_name));
        let content_type = mime_guess::from_path(&file.file_name)
            .first()
            .map(|mime| mime.to_string())
            .or_else(|| file.content_type.clone())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let upload_id = self.create_multipart_upload(&key, &content_type).await?;

        let parts = match self.upload_parts(&key, &upload_id, &file.data).await {
            Ok(parts) => parts,
            Err(e) => {
                error!(key, error = %e, "upload error");
                self.abort_multipart_upload(&key, &upload_id).await;
                return Err(e);
            }
        };

        let location = self.complete_multipart_upload(&key, &upload_id, parts).await?;
        info!(location = %location, bytes = file.data.len(), "stored movie file");
        Ok(location)
    }
}
