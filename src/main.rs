use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use movie_catalog::app;
use movie_catalog::config::settings::{AppConfig, MediaBackend};
use movie_catalog::infrastructure::db::pool;
use movie_catalog::infrastructure::storage::{LocalMediaStore, MediaStore, S3MediaStore};
use movie_catalog::modules::movie::parser::FormMovieParser;
use movie_catalog::modules::movie::repository::PostgresMovieRepository;
use movie_catalog::modules::movie::service::MovieServiceImpl;
use movie_catalog::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("failed to load configuration")?;

    let db = pool::connect_to_db(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    pool::run_migrations(&db)
        .await
        .context("failed to run migrations")?;

    let media: Arc<dyn MediaStore> = match (&config.media_backend, &config.s3) {
        (MediaBackend::S3, Some(s3)) => Arc::new(S3MediaStore::new(
            &s3.endpoint,
            &s3.bucket,
            &s3.access_key,
            &s3.secret_key,
        )),
        _ => {
            info!(dir = %config.upload_dir, "✅ Using local media store");
            Arc::new(LocalMediaStore::new(&config.upload_dir))
        }
    };

    let repository = Arc::new(PostgresMovieRepository::new(db));
    let state = AppState::new(
        config.clone(),
        Arc::new(FormMovieParser::new()),
        Arc::new(MovieServiceImpl::new(repository)),
        media,
    );

    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
