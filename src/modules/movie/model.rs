use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 2;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub artists: String,
    pub genres: String,
    pub file_path: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub deleted_at: Option<OffsetDateTime>,
}

/// Movie fields accepted from a create request, before the media file is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub artists: String,
    pub genres: String,
}

/// A movie ready to be inserted: media stored, timestamps stamped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub artists: String,
    pub genres: String,
    pub file_path: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields supplied on update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub artists: Option<String>,
    pub genres: Option<String>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.duration_minutes.is_none()
            && self.artists.is_none()
            && self.genres.is_none()
    }
}

/// Search criteria plus pagination for a single list request.
///
/// `page` and `limit` keep whatever the request carried (zero when absent);
/// [`MovieFilter::page`] and [`MovieFilter::limit`] resolve the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub artists: Vec<String>,
    pub page: i64,
    pub limit: i64,
}

impl MovieFilter {
    pub fn page(&self) -> i64 {
        if self.page <= 0 { DEFAULT_PAGE } else { self.page }
    }

    pub fn limit(&self) -> i64 {
        if self.limit <= 0 { DEFAULT_LIMIT } else { self.limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}
