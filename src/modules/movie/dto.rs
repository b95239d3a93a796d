use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::Movie;
use crate::common::response::Pagination;

/// Multipart body of `POST /api/movies/`. Documentation only; the handler reads
/// the form through [`crate::common::form::MovieForm`].
#[derive(ToSchema)]
pub struct CreateMovieForm {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub artists: Option<String>,
    pub genres: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub movie_file: Vec<u8>,
}

/// Body of `PUT /api/movies/{id}`. Fields left out or empty keep their stored value.
#[derive(ToSchema)]
pub struct UpdateMovieForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub artists: Option<String>,
    pub genres: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieListResponse {
    pub data: Vec<Movie>,
    pub pagination: Pagination,
}
