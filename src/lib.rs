pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::any};

use crate::config::Config;
use crate::services::store::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<ImageStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(ImageStore::new(
            config.image_dir.clone(),
            config.max_upload_size,
        ));
        Self { config, store }
    }
}

/// Every path goes through the method dispatcher: GET lists, POST uploads,
/// anything else gets a 501 (never the framework's 405). The framework body
/// limit is disabled since the upload cap is enforced by the bounded copy,
/// which must observe the cap being hit to answer with a 413.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::dispatch))
        .fallback(handlers::dispatch)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
