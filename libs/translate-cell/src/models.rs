use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

use crate::language::LanguageChoice;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: LanguageChoice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDetectorRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    /// Upper-cased language name, e.g. `ENGLISH`.
    pub language_detected: String,
}

/// Rejects text that is empty once trimmed.
pub fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Text must not be empty or whitespace.".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translation service is not configured")]
    NotConfigured,

    #[error("Chat completion returned no content")]
    EmptyCompletion,

    #[error("{0}")]
    Chat(#[from] anyhow::Error),
}
