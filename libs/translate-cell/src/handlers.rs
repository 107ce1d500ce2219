use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use tracing::error;

use shared_models::error::AppError;

use crate::language::LanguageChoice;
use crate::models::{require_text, LanguageDetectorRequest, TranslateRequest};
use crate::services::Translator;

/// 500 body keyed by the failing route, e.g. `{"Exception in /translate: ": "..."}`.
fn exception_response(route: &str, message: String) -> Response {
    let mut body = Map::new();
    body.insert(format!("Exception in {}: ", route), Value::String(message));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Object(body))).into_response()
}

#[axum::debug_handler]
pub async fn translate(
    State(translator): State<Arc<Translator>>,
    Json(request): Json<TranslateRequest>,
) -> Result<Response, AppError> {
    require_text(&request.text)?;
    if request.target_language == LanguageChoice::Unknown {
        return Err(AppError::ValidationError(
            "target_language must be one of english, chinese, malay or tamil.".to_string(),
        ));
    }

    match translator.translate(&request).await {
        Ok(response) => Ok(Json(response).into_response()),
        Err(e) => {
            error!("Translation failed: {}", e);
            Ok(exception_response("/translate", e.to_string()))
        }
    }
}

#[axum::debug_handler]
pub async fn get_language(
    State(translator): State<Arc<Translator>>,
    Json(request): Json<LanguageDetectorRequest>,
) -> Result<Response, AppError> {
    require_text(&request.text)?;

    match translator.get_language(&request.text).await {
        Ok(language) => Ok(Json(language).into_response()),
        Err(e) => {
            error!("Language detection failed: {}", e);
            Ok(exception_response("/translate/get_language", e.to_string()))
        }
    }
}
