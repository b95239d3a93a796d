use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::info;

use super::error::MovieError;
use super::model::{Movie, MovieChanges, MovieDraft, MovieFilter, NewMovie};
use super::repository::MovieRepository;

/// The four movie use cases. Media is stored by the caller before `create_movie`.
#[async_trait]
pub trait MovieService: Send + Sync {
    async fn create_movie(&self, draft: MovieDraft, file_path: String) -> Result<Movie, MovieError>;

    async fn list_movies(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), MovieError>;

    async fn update_movie(&self, id: i64, changes: MovieChanges) -> Result<Movie, MovieError>;

    async fn delete_movie(&self, id: i64) -> Result<(), MovieError>;
}

/// Current time at the precision PostgreSQL keeps (microseconds).
pub fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}

pub struct MovieServiceImpl {
    repository: Arc<dyn MovieRepository>,
    clock: fn() -> OffsetDateTime,
}

impl MovieServiceImpl {
    pub fn new(repository: Arc<dyn MovieRepository>) -> Self {
        Self {
            repository,
            clock: current_timestamp,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl MovieService for MovieServiceImpl {
    async fn create_movie(&self, draft: MovieDraft, file_path: String) -> Result<Movie, MovieError> {
        if draft.title.is_empty() {
            return Err(MovieError::validation("title is required"));
        }

        let now = (self.clock)();
        let movie = self
            .repository
            .create(NewMovie {
                title: draft.title,
                description: draft.description,
                duration_minutes: draft.duration_minutes,
                artists: draft.artists,
                genres: draft.genres,
                file_path,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(id = movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    async fn list_movies(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), MovieError> {
        self.repository.list(filter).await
    }

    async fn update_movie(&self, id: i64, changes: MovieChanges) -> Result<Movie, MovieError> {
        if id == 0 {
            return Err(MovieError::validation("movie ID is required"));
        }

        let movie = self.repository.update(id, changes, (self.clock)()).await?;

        info!(id, "movie updated");
        Ok(movie)
    }

    async fn delete_movie(&self, id: i64) -> Result<(), MovieError> {
        self.repository.delete(id).await?;

        info!(id, "movie deleted");
        Ok(())
    }
}
