use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    DatabaseMaxConnections,
    MediaBackend,
    UploadDir,
    MaxUploadMb,
    RequestTimeoutSecs,
    MinioUrl,
    MinioBucket,
    MinioAccessKey,
    MinioSecretKey,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::DatabaseMaxConnections => "DATABASE_MAX_CONNECTIONS",
            EnvKey::MediaBackend => "MEDIA_BACKEND",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::MaxUploadMb => "MAX_UPLOAD_MB",
            EnvKey::RequestTimeoutSecs => "REQUEST_TIMEOUT_SECS",
            EnvKey::MinioUrl => "MINIO_ENDPOINT",
            EnvKey::MinioBucket => "MINIO_BUCKET_VIDEOS",
            EnvKey::MinioAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::MinioSecretKey => "AWS_SECRET_ACCESS_KEY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
