use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::CurrentUser;
use shared_models::domain::VaccineRecord;
use shared_models::error::AppError;

use crate::models::{
    AvailableSlotResponse, AvailableSlotsQuery, BookingSlotResponse, RescheduleSlotRequest,
    ScheduleSlotRequest,
};
use crate::services::BookingService;

#[axum::debug_handler]
pub async fn get_available_slots(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<AvailableSlotResponse>>, AppError> {
    let service = BookingService::new(&config);
    let slots = service.available_slots(&user.id, &query).await?;
    Ok(Json(slots.iter().map(AvailableSlotResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn get_booking_slot(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Path(slot_id): Path<String>,
) -> Result<Json<BookingSlotResponse>, AppError> {
    let service = BookingService::new(&config);
    let slot = service.get_slot(&user.id, &slot_id).await?;
    Ok(Json(BookingSlotResponse::from(slot)))
}

#[axum::debug_handler]
pub async fn schedule_slot(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<ScheduleSlotRequest>,
) -> Result<(StatusCode, Json<VaccineRecord>), AppError> {
    let service = BookingService::new(&config);
    let record = service.schedule(&user.id, request.booking_slot_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[axum::debug_handler]
pub async fn cancel_slot(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Path(record_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&config);
    service.cancel(&user.id, &record_id).await?;
    Ok(Json(json!({ "detail": "Vaccination slot successfully cancelled." })))
}

#[axum::debug_handler]
pub async fn reschedule_slot(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<RescheduleSlotRequest>,
) -> Result<Json<VaccineRecord>, AppError> {
    let service = BookingService::new(&config);
    let record = service.reschedule(&user.id, request).await?;
    Ok(Json(record))
}
