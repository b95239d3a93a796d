use anyhow::{anyhow, Context, Result};

use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaBackend {
    Local,
    S3,
}

impl std::str::FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(MediaBackend::Local),
            "s3" | "minio" => Ok(MediaBackend::S3),
            other => Err(anyhow!("unknown media backend '{other}', expected 'local' or 's3'")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct S3Settings {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub media_backend: MediaBackend,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
    pub s3: Option<S3Settings>,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let media_backend: MediaBackend = env::get_or(EnvKey::MediaBackend, "local").parse()?;

        let s3 = match media_backend {
            MediaBackend::Local => None,
            MediaBackend::S3 => Some(S3Settings {
                endpoint: required(EnvKey::MinioUrl)?,
                bucket: required(EnvKey::MinioBucket)?,
                access_key: required(EnvKey::MinioAccessKey)?,
                secret_key: required(EnvKey::MinioSecretKey)?,
            }),
        };

        let max_upload_mb: usize = env::get_parsed(EnvKey::MaxUploadMb, 512);

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 8080),
            database_url: required(EnvKey::DatabaseUrl)?,
            database_max_connections: env::get_parsed(EnvKey::DatabaseMaxConnections, 20),
            media_backend,
            upload_dir: env::get_or(EnvKey::UploadDir, "uploads"),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            request_timeout_secs: env::get_parsed(EnvKey::RequestTimeoutSecs, 60),
            s3,
        })
    }

    /// Settings for tests and local tooling: local media store, no database URL.
    pub fn local(upload_dir: &str) -> Self {
        Self {
            server_port: 0,
            database_url: String::new(),
            database_max_connections: 1,
            media_backend: MediaBackend::Local,
            upload_dir: upload_dir.to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            request_timeout_secs: 30,
            s3: None,
        }
    }
}

fn required(key: EnvKey) -> Result<String> {
    let name = key.as_str();
    env::get(key).with_context(|| format!("{name} must be set"))
}
