use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::models::SpeechError;
use crate::services::SpeechToText;

const DEFAULT_AUDIO_TYPE: &str = "audio/wav; codecs=audio/pcm; samplerate=16000";

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Transcribes one uploaded audio file. The short-audio REST endpoint accepts a
/// single locale per request, so the optional `language` field picks it
/// (`en-SG` when absent) instead of auto-detecting among the four service
/// languages.
#[axum::debug_handler]
pub async fn transcribe(
    State(speech): State<Arc<SpeechToText>>,
    mut multipart: Multipart,
) -> Response {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut language: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return error_response(StatusCode::BAD_REQUEST, e.body_text());
            }
        };

        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .filter(|ct| ct.starts_with("audio/"))
                    .unwrap_or(DEFAULT_AUDIO_TYPE)
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) if !bytes.is_empty() => audio = Some((bytes.to_vec(), content_type)),
                    Ok(_) => {}
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
                }
            }
            Some("language") => {
                language = field.text().await.ok();
            }
            _ => {}
        }
    }

    let Some((bytes, content_type)) = audio else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided");
    };

    match speech.transcribe(bytes, &content_type, language.as_deref()).await {
        Ok(outcome) => {
            let (status, body) = outcome.status_and_body();
            (status, Json(body)).into_response()
        }
        Err(e @ SpeechError::UnsupportedLanguage(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ SpeechError::NotConfigured) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => {
            error!("Transcription failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Speech recognition error: {}", e),
            )
        }
    }
}
