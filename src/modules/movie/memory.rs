use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::error::MovieError;
use super::model::{Movie, MovieChanges, MovieFilter, NewMovie};
use super::repository::MovieRepository;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Movie>,
    next_id: i64,
}

/// In-process stand-in for [`super::repository::PostgresMovieRepository`].
///
/// Matches with the same rules as the SQL filters: title and description are
/// case-insensitive substrings, genres and artists case-sensitive ones.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    table: Mutex<Table>,
    fail: bool,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a storage error, as if the database were unreachable.
    pub fn failing() -> Self {
        Self {
            table: Mutex::default(),
            fail: true,
        }
    }

    /// All rows, soft-deleted ones included.
    pub async fn rows(&self) -> Vec<Movie> {
        self.table.lock().await.rows.clone()
    }

    fn check(&self, context: &'static str) -> Result<(), MovieError> {
        if self.fail {
            return Err(MovieError::storage(context)(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn matches(movie: &Movie, filter: &MovieFilter) -> bool {
    let contains_ci = |haystack: &str, needle: &str| {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    };

    movie.deleted_at.is_none()
        && filter
            .title
            .as_deref()
            .is_none_or(|title| contains_ci(&movie.title, title))
        && filter
            .description
            .as_deref()
            .is_none_or(|description| contains_ci(&movie.description, description))
        && (filter.genres.is_empty() || filter.genres.iter().any(|g| movie.genres.contains(g.as_str())))
        && (filter.artists.is_empty() || filter.artists.iter().any(|a| movie.artists.contains(a.as_str())))
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn create(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        self.check("failed to create movie")?;

        let mut table = self.table.lock().await;
        table.next_id += 1;

        let created = Movie {
            id: table.next_id,
            title: movie.title,
            description: movie.description,
            duration_minutes: movie.duration_minutes,
            artists: movie.artists,
            genres: movie.genres,
            file_path: movie.file_path,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
            deleted_at: None,
        };
        table.rows.push(created.clone());

        Ok(created)
    }

    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, i64), MovieError> {
        self.check("failed to get total movies")?;

        let table = self.table.lock().await;
        let mut found: Vec<Movie> = table
            .rows
            .iter()
            .filter(|movie| matches(movie, filter))
            .cloned()
            .collect();
        let total = found.len() as i64;

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let page = found
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();

        Ok((page, total))
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
        self.check("failed to update movie")?;

        let mut table = self.table.lock().await;
        let movie = table
            .rows
            .iter_mut()
            .find(|movie| movie.id == id && movie.deleted_at.is_none())
            .ok_or(MovieError::NotFound(id))?;

        if let Some(title) = changes.title {
            movie.title = title;
        }
        if let Some(description) = changes.description {
            movie.description = description;
        }
        if let Some(duration) = changes.duration_minutes {
            movie.duration_minutes = duration;
        }
        if let Some(artists) = changes.artists {
            movie.artists = artists;
        }
        if let Some(genres) = changes.genres {
            movie.genres = genres;
        }
        movie.updated_at = updated_at;

        Ok(movie.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), MovieError> {
        self.check("failed to delete movie")?;

        let mut table = self.table.lock().await;
        let movie = table
            .rows
            .iter_mut()
            .find(|movie| movie.id == id && movie.deleted_at.is_none())
            .ok_or(MovieError::NotFound(id))?;
        movie.deleted_at = Some(OffsetDateTime::now_utc());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::Duration;

    fn new_movie(title: &str, genres: &str, artists: &str, minutes_ago: i64) -> NewMovie {
        let at = OffsetDateTime::now_utc() - Duration::minutes(minutes_ago);
        NewMovie {
            title: title.to_string(),
            description: format!("{title} description"),
            duration_minutes: 100,
            artists: artists.to_string(),
            genres: genres.to_string(),
            file_path: format!("uploads/{title}.mp4"),
            created_at: at,
            updated_at: at,
        }
    }

    async fn seeded() -> InMemoryMovieRepository {
        let repo = InMemoryMovieRepository::new();
        repo.create(new_movie("Old Action", "Action", "Alice", 30)).await.unwrap();
        repo.create(new_movie("Drama Night", "Drama, Romance", "Bob", 20)).await.unwrap();
        repo.create(new_movie("New Action", "Action, Thriller", "Alice, Bob", 10)).await.unwrap();
        repo
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_newest_first_with_total_independent_of_page() {
        let repo = seeded().await;

        let (movies, total) = repo.list(&MovieFilter::default()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(titles(&movies), vec!["New Action", "Drama Night"]);

        let filter = MovieFilter {
            page: 2,
            ..Default::default()
        };
        let (movies, total) = repo.list(&filter).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(titles(&movies), vec!["Old Action"]);
    }

    #[tokio::test]
    async fn genre_values_are_or_combined() {
        let repo = seeded().await;
        let filter = MovieFilter {
            genres: vec!["Romance".to_string(), "Thriller".to_string()],
            limit: 10,
            ..Default::default()
        };

        let (movies, total) = repo.list(&filter).await.unwrap();

        assert_eq!(total, 2);
        assert_eq!(titles(&movies), vec!["New Action", "Drama Night"]);
    }

    #[tokio::test]
    async fn filter_groups_are_and_combined() {
        let repo = seeded().await;
        let filter = MovieFilter {
            title: Some("action".to_string()),
            artists: vec!["Bob".to_string()],
            limit: 10,
            ..Default::default()
        };

        let (movies, total) = repo.list(&filter).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(titles(&movies), vec!["New Action"]);
    }

    #[tokio::test]
    async fn unknown_genre_is_an_empty_page() {
        let repo = seeded().await;
        let filter = MovieFilter {
            genres: vec!["Western".to_string()],
            ..Default::default()
        };

        let (movies, total) = repo.list(&filter).await.unwrap();

        assert!(movies.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn deleted_rows_disappear_everywhere() {
        let repo = seeded().await;
        repo.delete(1).await.unwrap();

        let (movies, total) = repo
            .list(&MovieFilter { limit: 10, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(movies.iter().all(|m| m.id != 1));

        assert_matches!(repo.delete(1).await, Err(MovieError::NotFound(1)));
        assert_matches!(
            repo.update(1, MovieChanges::default(), OffsetDateTime::now_utc()).await,
            Err(MovieError::NotFound(1))
        );

        let rows = repo.rows().await;
        assert!(rows.iter().find(|m| m.id == 1).unwrap().deleted_at.is_some());
    }

    #[tokio::test]
    async fn update_only_touches_supplied_fields() {
        let repo = seeded().await;
        let before = repo.rows().await[1].clone();
        let now = OffsetDateTime::now_utc();
        let changes = MovieChanges {
            genres: Some("Drama".to_string()),
            ..Default::default()
        };

        let updated = repo.update(before.id, changes, now).await.unwrap();

        assert_eq!(updated.genres, "Drama");
        assert_eq!(updated.title, before.title);
        assert_eq!(updated.file_path, before.file_path);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.updated_at, now);
    }

    #[tokio::test]
    async fn failing_repository_reports_storage_errors() {
        let repo = InMemoryMovieRepository::failing();

        let err = repo.list(&MovieFilter::default()).await.unwrap_err();
        assert_matches!(err, MovieError::Storage { context: "failed to get total movies", .. });

        let err = repo.delete(1).await.unwrap_err();
        assert_matches!(err, MovieError::Storage { context: "failed to delete movie", .. });
    }
}
