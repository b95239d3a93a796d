#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;

use movie_catalog::app::create_app;
use movie_catalog::config::settings::AppConfig;
use movie_catalog::infrastructure::storage::{InMemoryMediaStore, MediaStore};
use movie_catalog::modules::movie::memory::InMemoryMovieRepository;
use movie_catalog::modules::movie::parser::{FormMovieParser, MovieParser};
use movie_catalog::modules::movie::service::{MovieService, MovieServiceImpl};
use movie_catalog::state::AppState;

pub const BOUNDARY: &str = "----movie-catalog-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryMovieRepository>,
    pub media: Arc<InMemoryMediaStore>,
}

pub fn test_app() -> TestApp {
    test_app_with(InMemoryMovieRepository::new(), InMemoryMediaStore::new())
}

pub fn test_app_with(repository: InMemoryMovieRepository, media: InMemoryMediaStore) -> TestApp {
    let repository = Arc::new(repository);
    let media = Arc::new(media);
    let service = Arc::new(MovieServiceImpl::new(repository.clone()));

    let router = build_router(Arc::new(FormMovieParser::new()), service, media.clone());

    TestApp {
        router,
        repository,
        media,
    }
}

pub fn build_router(
    parser: Arc<dyn MovieParser>,
    movies: Arc<dyn MovieService>,
    media: Arc<dyn MediaStore>,
) -> Router {
    let state = AppState::new(AppConfig::local("uploads"), parser, movies, media);
    create_app(state)
}

/// Multipart body with text `fields` and, optionally, a `movie_file` part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"movie_file\"; filename=\"{file_name}\"\r\nContent-Type: video/mp4\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn create_fields<'a>(title: &'a str, genres: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", title),
        ("description", "Test Description"),
        ("duration_minutes", "120"),
        ("artists", "Test Artist"),
        ("genres", genres),
    ]
}
