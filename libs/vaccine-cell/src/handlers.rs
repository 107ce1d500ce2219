use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use shared_config::AppConfig;
use shared_models::auth::CurrentUser;
use shared_models::domain::Vaccine;
use shared_models::error::AppError;

use crate::services::VaccineService;

#[axum::debug_handler]
pub async fn get_recommendations(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Vaccine>>, AppError> {
    let service = VaccineService::new(&config);
    let vaccines = service.recommendations_for(&user.id).await?;
    Ok(Json(vaccines))
}
