use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use shared_config::AppConfig;
use shared_models::auth::CurrentUser;
use shared_models::domain::VaccineRecord;
use shared_models::error::AppError;

use crate::services::RecordService;

#[axum::debug_handler]
pub async fn list_records(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<VaccineRecord>>, AppError> {
    let service = RecordService::new(&config);
    Ok(Json(service.list_records(&user.id).await?))
}

#[axum::debug_handler]
pub async fn get_record(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Path(record_id): Path<String>,
) -> Result<Json<VaccineRecord>, AppError> {
    let service = RecordService::new(&config);
    Ok(Json(service.get_record(&user.id, &record_id).await?))
}
