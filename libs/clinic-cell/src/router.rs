use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn clinic_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/clinics/nearest-by-location", get(handlers::nearest_by_location));

    let protected_routes = Router::new()
        .route("/clinics/nearest-by-home", get(handlers::nearest_by_home))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
