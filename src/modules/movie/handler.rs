use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use super::dto::{CreateMovieForm, MovieListResponse, UpdateMovieForm};
use super::error::MovieError;
use super::model::Movie;
use crate::common::form::{MovieForm, QueryParams};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess, Pagination};
use crate::state::AppState;

/// Create a movie from a multipart form with an attached video file
#[utoipa::path(
    post,
    path = "/api/movies/",
    request_body(content = CreateMovieForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<Movie>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Storing the file or the record failed")
    ),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    form: MovieForm,
) -> Result<impl IntoResponse, ApiError> {
    let (draft, file) = state.parser.parse_create(form)?;

    let file_path = state
        .media
        .store(&file)
        .await
        .map_err(MovieError::from)?;

    let movie = match state.movies.create_movie(draft, file_path.clone()).await {
        Ok(movie) => movie,
        Err(e) => {
            warn!(path = %file_path, "stored movie file has no record");
            return Err(e.into());
        }
    };

    Ok(ApiSuccess(
        ApiResponse::success(movie, "Movie created successfully"),
        StatusCode::CREATED,
    ))
}

/// List movies, newest first
#[utoipa::path(
    get,
    path = "/api/movies/",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive title substring"),
        ("description" = Option<String>, Query, description = "Case-insensitive description substring"),
        ("genre" = Option<Vec<String>>, Query, description = "Genre substring, repeatable, any may match"),
        ("artist" = Option<Vec<String>>, Query, description = "Artist substring, repeatable, any may match"),
        ("page" = Option<i64>, Query, description = "Page number, defaults to 1"),
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 2")
    ),
    responses(
        (status = 200, description = "Page of movies", body = ApiResponse<MovieListResponse>),
        (status = 400, description = "Invalid page or limit"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let filter = state
        .parser
        .parse_filter(&QueryParams::parse(query.as_deref()))?;

    let (movies, total) = state.movies.list_movies(&filter).await?;

    let response = MovieListResponse {
        data: movies,
        pagination: Pagination::new(filter.page(), filter.limit(), total),
    };

    Ok(ApiSuccess(
        ApiResponse::success(response, "Movies retrieved successfully"),
        StatusCode::OK,
    ))
}

/// Search movies; same filters and paging as the list endpoint
#[utoipa::path(
    get,
    path = "/api/movies/search",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive title substring"),
        ("description" = Option<String>, Query, description = "Case-insensitive description substring"),
        ("genre" = Option<Vec<String>>, Query, description = "Genre substring, repeatable, any may match"),
        ("artist" = Option<Vec<String>>, Query, description = "Artist substring, repeatable, any may match"),
        ("page" = Option<i64>, Query, description = "Page number, defaults to 1"),
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 2")
    ),
    responses(
        (status = 200, description = "Page of movies", body = ApiResponse<MovieListResponse>),
        (status = 400, description = "Invalid page or limit"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Movies"
)]
pub async fn search_movies(
    state: State<AppState>,
    query: RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    list_movies(state, query).await
}

/// Update the supplied fields of a movie
#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    params(
        ("id" = i64, Path, description = "Movie ID")
    ),
    request_body(content = UpdateMovieForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<Movie>),
        (status = 400, description = "Invalid ID or validation failed"),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: MovieForm,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.parser.parse_movie_id(&id)?;
    let changes = state.parser.parse_update(&form)?;

    let movie = state.movies.update_movie(id, changes).await?;

    Ok(ApiSuccess(
        ApiResponse::success(movie, "Movie updated successfully"),
        StatusCode::OK,
    ))
}

/// Soft-delete a movie
#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    params(
        ("id" = i64, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie deleted", body = ApiResponse<String>),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.parser.parse_movie_id(&id)?;

    state.movies.delete_movie(id).await?;

    Ok(ApiSuccess(
        ApiResponse::success(format!("movie with ID {id} deleted"), "Movie deleted successfully"),
        StatusCode::OK,
    ))
}
