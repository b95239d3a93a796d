use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use super::error::MovieError;
use super::model::{Movie, MovieChanges, MovieFilter, NewMovie};

const MOVIE_COLUMNS: &str = "id, title, description, duration_minutes, artists, genres, \
     file_path, created_at, updated_at, deleted_at";

/// Persistence boundary for movies. Soft-deleted rows are invisible through every method.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError>;

    /// One page of matches, newest first, plus the number of matches across all pages.
    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), MovieError>;

    /// Applies `changes` and returns the row as stored afterwards.
    async fn update(
        &self,
        id: i64,
        changes: MovieChanges,
        updated_at: OffsetDateTime,
    ) -> Result<Movie, MovieError>;

    async fn delete(&self, id: i64) -> Result<(), MovieError>;
}

#[derive(Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// `%value%` with LIKE wildcards in `value` escaped.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter_clauses(qb: &mut QueryBuilder<'_, Postgres>, filter: &MovieFilter) {
    qb.push(" WHERE deleted_at IS NULL");

    if let Some(title) = &filter.title {
        qb.push(" AND LOWER(title) LIKE ")
            .push_bind(contains_pattern(&title.to_lowercase()));
    }

    if let Some(description) = &filter.description {
        qb.push(" AND LOWER(description) LIKE ")
            .push_bind(contains_pattern(&description.to_lowercase()));
    }

    push_any_like(qb, "genres", &filter.genres);
    push_any_like(qb, "artists", &filter.artists);
}

/// ` AND (column LIKE $a OR column LIKE $b ...)`, nothing for an empty set.
fn push_any_like(qb: &mut QueryBuilder<'_, Postgres>, column: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }

    qb.push(" AND (");
    let mut any = qb.separated(" OR ");
    for value in values {
        any.push(format!("{column} LIKE "))
            .push_bind_unseparated(contains_pattern(value));
    }
    qb.push(")");
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies
                (title, description, duration_minutes, artists, genres, file_path, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.duration_minutes)
        .bind(&movie.artists)
        .bind(&movie.genres)
        .bind(&movie.file_path)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(MovieError::storage("failed to create movie"))
    }

    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), MovieError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movies");
        push_filter_clauses(&mut count, filter);

        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(MovieError::storage("failed to get total movies"))?;

        let mut page = QueryBuilder::<Postgres>::new(format!("SELECT {MOVIE_COLUMNS} FROM movies"));
        push_filter_clauses(&mut page, filter);
        page.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(filter.limit())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let movies = page
            .build_query_as::<Movie>()
            .fetch_all(&self.pool)
            .await
            .map_err(MovieError::storage("failed to get movies"))?;

        Ok((movies, total))
    }

    async fn update(
        &self,
        id: i64,
        changes: MovieChanges,
        updated_at: OffsetDateTime,
    ) -> Result<Movie, MovieError> {
        if id == 0 {
            return Err(MovieError::validation("movie ID is required"));
        }

        // file_path and created_at are never written after insert.
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                duration_minutes = COALESCE($3, duration_minutes),
                artists = COALESCE($4, artists),
                genres = COALESCE($5, genres),
                updated_at = $6
            WHERE id = $7 AND deleted_at IS NULL
            "#,
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.duration_minutes)
        .bind(changes.artists)
        .bind(changes.genres)
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(MovieError::storage("failed to update movie"))?;

        if result.rows_affected() == 0 {
            return Err(MovieError::NotFound(id));
        }

        self.find_by_id(id)
            .await
            .map_err(MovieError::storage("failed to get updated movie"))?
            .ok_or(MovieError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), MovieError> {
        let result = sqlx::query(
            "UPDATE movies SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        )
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(MovieError::storage("failed to delete movie"))?;

        if result.rows_affected() == 0 {
            return Err(MovieError::NotFound(id));
        }

        Ok(())
    }
}
