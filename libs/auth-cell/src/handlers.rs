use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use shared_config::AppConfig;
use shared_models::auth::{AuditActor, LoginForm};
use shared_models::error::AppError;

use crate::models::SignupRequest;
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn signup(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<Response, AppError> {
    let service = AuthService::new(&config);
    let created = service.signup(request).await?;

    let actor = AuditActor(created.id.to_string());
    let mut response = (StatusCode::CREATED, Json(created)).into_response();
    response.extensions_mut().insert(actor);
    Ok(response)
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Form(credentials): Form<LoginForm>,
) -> Result<Response, AppError> {
    let service = AuthService::new(&config);
    let (user_id, token) = service
        .login(&credentials.username, &credentials.password)
        .await?;

    let mut response = Json(token).into_response();
    response.extensions_mut().insert(AuditActor(user_id));
    Ok(response)
}
