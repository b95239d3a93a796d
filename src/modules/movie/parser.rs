use std::path::Path;

use super::error::MovieError;
use super::model::{MovieChanges, MovieDraft, MovieFilter};
use crate::common::form::{MovieForm, QueryParams, UploadedFile};

pub const MOVIE_FILE_FIELD: &str = "movie_file";
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".mp4", ".mov", ".mkv", ".avi"];

/// Turns buffered request data into domain values. Never touches storage.
pub trait MovieParser: Send + Sync {
    fn parse_create(&self, form: MovieForm) -> Result<(MovieDraft, UploadedFile), MovieError>;

    fn parse_filter(&self, query: &QueryParams) -> Result<MovieFilter, MovieError>;

    fn parse_update(&self, form: &MovieForm) -> Result<MovieChanges, MovieError>;

    fn parse_movie_id(&self, raw: &str) -> Result<i64, MovieError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| MovieError::validation("invalid movie ID"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormMovieParser;

impl FormMovieParser {
    pub fn new() -> Self {
        Self
    }
}

impl MovieParser for FormMovieParser {
    fn parse_create(&self, mut form: MovieForm) -> Result<(MovieDraft, UploadedFile), MovieError> {
        let title = form.value("title");
        if title.is_empty() {
            return Err(MovieError::validation("title is required"));
        }

        let duration_minutes = form
            .value("duration_minutes")
            .parse::<i32>()
            .map_err(|_| MovieError::validation("duration must be a number"))?;

        let draft = MovieDraft {
            title: title.to_string(),
            description: form.value("description").to_string(),
            duration_minutes,
            artists: form.value("artists").to_string(),
            genres: form.value("genres").to_string(),
        };

        let file = form
            .take_file(MOVIE_FILE_FIELD)
            .ok_or_else(|| MovieError::validation("movie file is required"))?;

        let ext = file_extension(&file.file_name);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(MovieError::validation(format!(
                "file extension {ext} is not allowed"
            )));
        }

        Ok((draft, file))
    }

    fn parse_filter(&self, query: &QueryParams) -> Result<MovieFilter, MovieError> {
        let page = match query.get("page") {
            "" => 0,
            raw => {
                let page = raw.parse::<i64>().map_err(|_| {
                    MovieError::validation(format!("page number is not valid: '{raw}'"))
                })?;
                if page <= 0 {
                    return Err(MovieError::validation(format!(
                        "page number must be greater than 0: {page}"
                    )));
                }
                page
            }
        };

        // A limit of 0 is accepted here and falls back to the default when read.
        let limit = match query.get("limit") {
            "" => 0,
            raw => {
                let limit = raw.parse::<i64>().map_err(|_| {
                    MovieError::validation(format!("limit number is not valid: '{raw}'"))
                })?;
                if limit < 0 {
                    return Err(MovieError::validation(format!(
                        "limit number must be greater than 0: {limit}"
                    )));
                }
                limit
            }
        };

        Ok(MovieFilter {
            title: non_empty(query.get("title")),
            description: non_empty(query.get("description")),
            genres: query.get_all("genre"),
            artists: query.get_all("artist"),
            page,
            limit,
        })
    }

    fn parse_update(&self, form: &MovieForm) -> Result<MovieChanges, MovieError> {
        let duration_minutes = match form.value("duration_minutes") {
            "" => None,
            raw => Some(raw.parse::<i32>().map_err(|_| {
                MovieError::validation(format!("duration must be a number: '{raw}'"))
            })?),
        };

        Ok(MovieChanges {
            title: non_empty(form.value("title")),
            description: non_empty(form.value("description")),
            duration_minutes,
            artists: non_empty(form.value("artists")),
            genres: non_empty(form.value("genres")),
        })
    }
}

/// Lowercased extension with its leading dot, or empty when there is none.
fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use bytes::Bytes;

    fn video(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("video/mp4".to_string()),
            data: Bytes::from_static(b"test content"),
        }
    }

    fn create_form() -> MovieForm {
        MovieForm::new()
            .with_field("title", "Test Movie")
            .with_field("description", "Test Description")
            .with_field("duration_minutes", "120")
            .with_field("artists", "Test Artist")
            .with_field("genres", "Action")
            .with_file(MOVIE_FILE_FIELD, video("test.mp4"))
    }

    fn validation_message(err: MovieError) -> String {
        assert_matches!(err, MovieError::Validation(_));
        err.to_string()
    }

    #[test]
    fn parses_complete_create_form() {
        let (draft, file) = FormMovieParser.parse_create(create_form()).unwrap();

        assert_eq!(
            draft,
            MovieDraft {
                title: "Test Movie".to_string(),
                description: "Test Description".to_string(),
                duration_minutes: 120,
                artists: "Test Artist".to_string(),
                genres: "Action".to_string(),
            }
        );
        assert_eq!(file.file_name, "test.mp4");
    }

    #[test]
    fn optional_create_fields_may_be_missing() {
        let form = MovieForm::new()
            .with_field("title", "Bare")
            .with_field("duration_minutes", "90")
            .with_file(MOVIE_FILE_FIELD, video("bare.MKV"));

        let (draft, _) = FormMovieParser.parse_create(form).unwrap();

        assert_eq!(draft.description, "");
        assert_eq!(draft.artists, "");
        assert_eq!(draft.genres, "");
    }

    #[test]
    fn create_requires_title() {
        let form = MovieForm::from_urlencoded(b"title=&duration_minutes=120")
            .with_file(MOVIE_FILE_FIELD, video("test.mp4"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "title is required");

        let form = MovieForm::new()
            .with_field("duration_minutes", "120")
            .with_file(MOVIE_FILE_FIELD, video("test.mp4"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "title is required");
    }

    #[test]
    fn create_rejects_non_numeric_duration() {
        for raw in ["abc", "", "12.5", " 12"] {
            let form = MovieForm::new()
                .with_field("title", "Test Movie")
                .with_field("duration_minutes", raw)
                .with_file(MOVIE_FILE_FIELD, video("test.mp4"));
            let err = FormMovieParser.parse_create(form).unwrap_err();
            assert_eq!(validation_message(err), "duration must be a number");
        }
    }

    #[test]
    fn create_duration_check_ignores_file_validity() {
        let form = MovieForm::new()
            .with_field("title", "Test Movie")
            .with_field("duration_minutes", "abc")
            .with_file(MOVIE_FILE_FIELD, video("virus.exe"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "duration must be a number");
    }

    #[test]
    fn create_requires_movie_file() {
        let form = MovieForm::new()
            .with_field("title", "Test Movie")
            .with_field("duration_minutes", "120")
            .with_file("poster", video("test.mp4"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "movie file is required");
    }

    #[test]
    fn create_checks_extension_case_insensitively() {
        for name in ["a.mp4", "b.MOV", "c.Mkv", "d.avi"] {
            let form = MovieForm::new()
                .with_field("title", "Test Movie")
                .with_field("duration_minutes", "120")
                .with_file(MOVIE_FILE_FIELD, video(name));
            assert!(FormMovieParser.parse_create(form).is_ok(), "{name} should be accepted");
        }

        let form = MovieForm::new()
            .with_field("title", "Test Movie")
            .with_field("duration_minutes", "120")
            .with_file(MOVIE_FILE_FIELD, video("notes.TXT"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "file extension .txt is not allowed");

        let form = MovieForm::new()
            .with_field("title", "Test Movie")
            .with_field("duration_minutes", "120")
            .with_file(MOVIE_FILE_FIELD, video("noextension"));
        let err = FormMovieParser.parse_create(form).unwrap_err();
        assert_eq!(validation_message(err), "file extension  is not allowed");
    }

    #[test]
    fn filter_collects_everything() {
        let query = QueryParams::parse(Some(
            "title=Test&description=desc&genre=Action&genre=Drama&artist=Someone&page=2&limit=5",
        ));

        let filter = FormMovieParser.parse_filter(&query).unwrap();

        assert_eq!(
            filter,
            MovieFilter {
                title: Some("Test".to_string()),
                description: Some("desc".to_string()),
                genres: vec!["Action".to_string(), "Drama".to_string()],
                artists: vec!["Someone".to_string()],
                page: 2,
                limit: 5,
            }
        );
    }

    #[test]
    fn empty_filter_leaves_pagination_unset() {
        let filter = FormMovieParser.parse_filter(&QueryParams::parse(None)).unwrap();
        assert_eq!(filter, MovieFilter::default());
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.limit(), 2);
    }

    #[test]
    fn filter_rejects_bad_page() {
        let err = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("page=abc")))
            .unwrap_err();
        assert_eq!(validation_message(err), "page number is not valid: 'abc'");

        let err = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("page=0")))
            .unwrap_err();
        assert_eq!(validation_message(err), "page number must be greater than 0: 0");

        let err = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("page=-1")))
            .unwrap_err();
        assert_eq!(validation_message(err), "page number must be greater than 0: -1");
    }

    #[test]
    fn filter_accepts_zero_limit_and_rejects_negative() {
        let filter = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("limit=0")))
            .unwrap();
        assert_eq!(filter.limit, 0);
        assert_eq!(filter.limit(), 2);

        let err = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("limit=-3")))
            .unwrap_err();
        assert_eq!(validation_message(err), "limit number must be greater than 0: -3");

        let err = FormMovieParser
            .parse_filter(&QueryParams::parse(Some("limit=ten")))
            .unwrap_err();
        assert_eq!(validation_message(err), "limit number is not valid: 'ten'");
    }

    #[test]
    fn update_fields_are_all_optional() {
        let changes = FormMovieParser.parse_update(&MovieForm::new()).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_treats_empty_values_as_not_supplied() {
        let form = MovieForm::from_urlencoded(b"title=&description=New+Description&duration_minutes=");
        let changes = FormMovieParser.parse_update(&form).unwrap();

        assert_eq!(
            changes,
            MovieChanges {
                description: Some("New Description".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_parses_duration_when_present() {
        let form = MovieForm::new()
            .with_field("title", "Updated Movie")
            .with_field("duration_minutes", "150");
        let changes = FormMovieParser.parse_update(&form).unwrap();
        assert_eq!(changes.title.as_deref(), Some("Updated Movie"));
        assert_eq!(changes.duration_minutes, Some(150));

        let form = MovieForm::new().with_field("duration_minutes", "abc");
        let err = FormMovieParser.parse_update(&form).unwrap_err();
        assert_eq!(validation_message(err), "duration must be a number: 'abc'");
    }

    #[test]
    fn movie_id_must_be_an_integer() {
        assert_eq!(FormMovieParser.parse_movie_id("42").unwrap(), 42);
        let err = FormMovieParser.parse_movie_id("abc").unwrap_err();
        assert_eq!(validation_message(err), "invalid movie ID");
    }
}
