use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use audit_cell::{audit_middleware, AuditState};
use auth_cell::auth_routes;
use booking_cell::booking_routes;
use clinic_cell::clinic_routes;
use record_cell::record_routes;
use shared_config::AppConfig;
use speech_cell::speech_routes;
use translate_cell::translate_routes;
use user_cell::user_routes;
use vaccine_cell::vaccine_routes;

async fn root() -> Json<Value> {
    Json(json!({ "detail": "Hello World!" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "detail": "Healthy" }))
}

pub fn create_router(config: Arc<AppConfig>, audit: AuditState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes(config.clone()))
        .merge(user_routes(config.clone()))
        .merge(clinic_routes(config.clone()))
        .merge(vaccine_routes(config.clone()))
        .merge(booking_routes(config.clone()))
        .merge(record_routes(config.clone()))
        .merge(speech_routes(config.clone()))
        .merge(translate_routes(config))
        .layer(middleware::from_fn_with_state(audit, audit_middleware))
}
