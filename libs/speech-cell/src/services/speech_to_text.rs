use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::{RecognitionResult, SpeechError, TranscriptionOutcome, RECOGNITION_LANGUAGES};

/// Issued tokens are valid for ten minutes.
const TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 60);
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn issued_now(value: String) -> Self {
        Self {
            value,
            expires_at: Instant::now() + TOKEN_LIFETIME,
        }
    }

    fn expires_soon(&self, now: Instant) -> bool {
        self.expires_at <= now + REFRESH_MARGIN
    }
}

/// Speech recognition client. Shared across requests so the access token
/// cache survives between calls.
pub struct SpeechToText {
    client: Client,
    subscription_key: String,
    base_url: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpeechToText {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            subscription_key: config.speech_key.clone(),
            base_url: config.speech_base_url.trim_end_matches('/').to_string(),
            token_url: config.speech_token_url.clone(),
            token: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.subscription_key.is_empty() && !self.base_url.is_empty() && !self.token_url.is_empty()
    }

    /// Resolves the requested locale, falling back to the first supported one.
    pub fn resolve_language(language: Option<&str>) -> Result<&'static str, SpeechError> {
        match language.map(str::trim).filter(|l| !l.is_empty()) {
            None => Ok(RECOGNITION_LANGUAGES[0]),
            Some(requested) => RECOGNITION_LANGUAGES
                .iter()
                .find(|supported| supported.eq_ignore_ascii_case(requested))
                .copied()
                .ok_or_else(|| SpeechError::UnsupportedLanguage(requested.to_string())),
        }
    }

    async fn access_token(&self) -> Result<String, SpeechError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.expires_soon(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("Speech access token expiring, refreshing");
        }

        let response = self
            .client
            .post(&self.token_url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Length", "0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Speech token request rejected");
            return Err(SpeechError::Token(format!("{}: {}", status, body)));
        }

        let value = response.text().await?.trim().to_string();
        if value.is_empty() {
            return Err(SpeechError::Token("empty token".to_string()));
        }

        *cached = Some(CachedToken::issued_now(value.clone()));
        info!("Speech access token refreshed");
        Ok(value)
    }

    /// Sends one short utterance for recognition.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        content_type: &str,
        language: Option<&str>,
    ) -> Result<TranscriptionOutcome, SpeechError> {
        if !self.is_configured() {
            return Err(SpeechError::NotConfigured);
        }
        let language = Self::resolve_language(language)?;
        let token = self.access_token().await?;

        let url = format!(
            "{}/speech/recognition/conversation/cognitiveservices/v1",
            self.base_url
        );
        debug!(language, bytes = audio.len(), "Submitting audio for recognition");

        let response = self
            .client
            .post(&url)
            .query(&[("language", language), ("format", "simple")])
            .bearer_auth(token)
            .header("Content-Type", content_type)
            .header("Accept", "application/json")
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Speech recognition request failed");
            return Ok(TranscriptionOutcome::Failed(status.to_string()));
        }

        let result: RecognitionResult = response.json().await?;
        info!(status = %result.recognition_status, language, "Speech recognition finished");
        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn token_refreshes_inside_margin() {
        let now = Instant::now();
        let fresh = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(300),
        };
        let stale = CachedToken {
            value: "t".to_string(),
            expires_at: now + Duration::from_secs(30),
        };
        assert!(!fresh.expires_soon(now));
        assert!(stale.expires_soon(now));
    }

    #[test]
    fn language_defaults_and_matches_case_insensitively() {
        assert_eq!(SpeechToText::resolve_language(None).unwrap(), "en-SG");
        assert_eq!(SpeechToText::resolve_language(Some(" ")).unwrap(), "en-SG");
        assert_eq!(SpeechToText::resolve_language(Some("zh-cn")).unwrap(), "zh-CN");
        assert_matches!(
            SpeechToText::resolve_language(Some("fr-FR")),
            Err(SpeechError::UnsupportedLanguage(_))
        );
    }
}
