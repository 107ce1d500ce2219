use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn record_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/records", get(handlers::list_records))
        .route("/records/{id}", get(handlers::get_record))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
