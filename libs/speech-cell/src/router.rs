use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use shared_config::AppConfig;

use crate::handlers::transcribe;
use crate::services::SpeechToText;

/// Audio uploads are capped at 25 MiB.
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub fn speech_routes(config: Arc<AppConfig>) -> Router {
    let speech = Arc::new(SpeechToText::new(&config));

    Router::new()
        .route("/transcription", post(transcribe))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES))
        .with_state(speech)
}
