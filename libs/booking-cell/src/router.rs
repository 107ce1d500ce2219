use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn booking_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/bookings/available", get(get_available_slots))
        .route("/bookings/schedule", post(schedule_slot))
        .route("/bookings/reschedule", post(reschedule_slot))
        .route("/bookings/cancel/{record_id}", delete(cancel_slot))
        .route("/bookings/{id}", get(get_booking_slot))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
