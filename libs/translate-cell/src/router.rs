use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::{get_language, translate};
use crate::services::Translator;

pub fn translate_routes(config: Arc<AppConfig>) -> Router {
    translator_routes(Arc::new(Translator::from_config(&config)))
}

pub fn translator_routes(translator: Arc<Translator>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/translate/get_language", post(get_language))
        .with_state(translator)
}
