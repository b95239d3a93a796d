use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::storage::MediaStore;
use crate::modules::movie::parser::MovieParser;
use crate::modules::movie::service::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub parser: Arc<dyn MovieParser>,
    pub movies: Arc<dyn MovieService>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        parser: Arc<dyn MovieParser>,
        movies: Arc<dyn MovieService>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            config,
            parser,
            movies,
            media,
        }
    }
}
