use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::CurrentUser;
use shared_models::error::AppError;

use crate::models::{UpdateUserRequest, UserResponse, UserUpdateResponse};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn get_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, AppError> {
    let service = UserService::new(&config);
    let row = service.get_user(&user.id).await?;
    Ok(Json(UserResponse::from(&row)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserUpdateResponse>, AppError> {
    let service = UserService::new(&config);
    let updated = service.update_profile(&user.id, request).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    service.delete_user(&user.id, &user_id).await?;
    Ok(Json(json!({ "detail": "User successfully deleted." })))
}
