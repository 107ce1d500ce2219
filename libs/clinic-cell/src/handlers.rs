use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};

use shared_config::AppConfig;
use shared_models::auth::CurrentUser;
use shared_models::domain::ClinicResponse;
use shared_models::error::AppError;

use crate::distance::Coordinates;
use crate::models::{NearestByHomeQuery, NearestByLocationQuery};
use crate::services::ClinicService;

#[axum::debug_handler]
pub async fn nearest_by_home(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<NearestByHomeQuery>,
) -> Result<Json<Vec<ClinicResponse>>, AppError> {
    let service = ClinicService::new(&config);
    let clinics = service
        .nearest_to_home(&user.id, query.clinic_limit, query.clinic_type)
        .await?;
    Ok(Json(clinics.iter().map(ClinicResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn nearest_by_location(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<NearestByLocationQuery>,
) -> Result<Json<Vec<ClinicResponse>>, AppError> {
    let service = ClinicService::new(&config);
    let origin = Coordinates::new(query.latitude, query.longitude);
    let clinics = service
        .nearest(origin, query.clinic_limit, query.clinic_type)
        .await?;
    Ok(Json(clinics.iter().map(ClinicResponse::from).collect()))
}
