use utoipa::OpenApi;

use crate::common::response::Pagination;
use crate::modules::movie::dto::{CreateMovieForm, MovieListResponse, UpdateMovieForm};
use crate::modules::movie::model::Movie;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::modules::movie::handler::create_movie,
        crate::modules::movie::handler::list_movies,
        crate::modules::movie::handler::search_movies,
        crate::modules::movie::handler::update_movie,
        crate::modules::movie::handler::delete_movie,
    ),
    components(
        schemas(
            Movie, Pagination, MovieListResponse, CreateMovieForm, UpdateMovieForm,
        )
    ),
    tags(
        (name = "Movies", description = "Movie catalog"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
