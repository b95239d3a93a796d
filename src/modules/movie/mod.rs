use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod memory;
pub mod model;
pub mod parser;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/movies", get(handler::list_movies).post(handler::create_movie))
        .route("/api/movies/", get(handler::list_movies).post(handler::create_movie))
        .route("/api/movies/search", get(handler::search_movies))
        .route(
            "/api/movies/{id}",
            put(handler::update_movie).delete(handler::delete_movie),
        )
}
