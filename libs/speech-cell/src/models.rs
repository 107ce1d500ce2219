use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Locales the recognizer accepts; the first is used when none is requested.
pub const RECOGNITION_LANGUAGES: [&str; 4] = ["en-SG", "zh-CN", "ta-IN", "ms-MY"];

pub const NO_MATCH_MESSAGE: &str =
    "No spoken words were detected, please try saying your query again. Thank you!";

/// Non-standard status used when recognition heard nothing.
pub const NO_MATCH_STATUS: u16 = 528;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Body returned by the short-audio recognition endpoint (simple format).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecognitionResult {
    pub recognition_status: String,
    #[serde(default)]
    pub display_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionOutcome {
    Recognized(String),
    NoMatch,
    Failed(String),
}

impl From<RecognitionResult> for TranscriptionOutcome {
    fn from(result: RecognitionResult) -> Self {
        match result.recognition_status.as_str() {
            "Success" => TranscriptionOutcome::Recognized(result.display_text.unwrap_or_default()),
            "NoMatch" | "InitialSilenceTimeout" => TranscriptionOutcome::NoMatch,
            other => TranscriptionOutcome::Failed(other.to_string()),
        }
    }
}

impl TranscriptionOutcome {
    pub fn status_and_body(self) -> (StatusCode, Value) {
        match self {
            TranscriptionOutcome::Recognized(text) => (
                StatusCode::OK,
                json!(TranscriptionResponse { text }),
            ),
            TranscriptionOutcome::NoMatch => (
                StatusCode::from_u16(NO_MATCH_STATUS).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
                json!({ "error": NO_MATCH_MESSAGE }),
            ),
            TranscriptionOutcome::Failed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Speech recognition error: {}", reason) }),
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech service is not configured")]
    NotConfigured,

    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),

    #[error("Could not obtain speech access token: {0}")]
    Token(String),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}
