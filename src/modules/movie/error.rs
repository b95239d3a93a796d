use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::common::response::ApiError;
use crate::infrastructure::storage::MediaError;

#[derive(Debug, Error)]
pub enum MovieError {
    /// Malformed or missing input; the message is shown to the client as-is.
    #[error("{0}")]
    Validation(String),

    #[error("movie with ID {0} not found")]
    NotFound(i64),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl MovieError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            MovieError::Validation(_) => StatusCode::BAD_REQUEST,
            MovieError::NotFound(_) => StatusCode::NOT_FOUND,
            MovieError::Storage { .. } | MovieError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            error!(error = ?err, "movie request failed");
        }
        ApiError(err.to_string(), status)
    }
}
