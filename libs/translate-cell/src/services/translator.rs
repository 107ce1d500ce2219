use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::detection::LanguageDetector;
use crate::language::LanguageChoice;
use crate::models::{TranslateError, TranslateRequest, TranslateResponse};
use crate::services::chat::{ChatClient, ChatOptions};
use crate::terms::OfficialTerms;

/// Heuristic detections above this score skip the model.
pub const LANGUAGE_SCORE_THRESHOLD: f64 = 0.7;

const DETECTOR_FUNCTION: &str = "language_detector";
const DETECTOR_PARAMETER: &str = "language";

const DETECTOR_PROMPT: &str = "You identify the language of a message sent to a vaccination \
booking assistant in Singapore. The answer is one of english, chinese, malay or tamil. \
Call the language_detector function with your answer and respond in JSON.";

fn detector_tool() -> Value {
    json!([{
        "type": "function",
        "function": {
            "name": DETECTOR_FUNCTION,
            "description": "Records the language the user's message is written in.",
            "parameters": {
                "type": "object",
                "properties": {
                    "language": {
                        "type": "string",
                        "enum": ["english", "chinese", "malay", "tamil"],
                        "description": "Language of the user's message"
                    }
                },
                "required": [DETECTOR_PARAMETER]
            }
        }
    }])
}

fn translator_prompt(target: LanguageChoice, glossary: &str) -> String {
    let mut prompt = format!(
        "You are a professional medical translator for a vaccination booking service in \
Singapore. Translate the user's message into {}. Reply with the translation only.",
        target
    );
    if !glossary.is_empty() {
        prompt.push_str(
            "\n\nWhenever a term from this glossary appears, use its official translation:\n\n",
        );
        prompt.push_str(glossary);
    }
    prompt
}

/// Language detection and translation. Shared across requests.
pub struct Translator {
    chat: ChatClient,
    terms: OfficialTerms,
    detector: LanguageDetector,
    score_threshold: f64,
}

impl Translator {
    pub fn new(chat: ChatClient, terms: OfficialTerms) -> Self {
        Self {
            chat,
            terms,
            detector: LanguageDetector::new(),
            score_threshold: LANGUAGE_SCORE_THRESHOLD,
        }
    }

    /// Detections must score strictly above `threshold` to skip the model.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ChatClient::new(config),
            OfficialTerms::load_or_empty(&config.official_terms_path),
        )
    }

    pub async fn get_language(&self, text: &str) -> Result<LanguageChoice, TranslateError> {
        let detection = self.detector.detect(text);
        debug!(language = %detection.language, confidence = detection.confidence, "Offline language detection");

        if detection.language == LanguageChoice::Unknown
            || detection.confidence > self.score_threshold
        {
            return Ok(detection.language);
        }

        if !self.chat.is_configured() {
            warn!("Chat model not configured, keeping low-confidence detection");
            return Ok(detection.language);
        }

        let messages = [
            json!({ "role": "system", "content": DETECTOR_PROMPT }),
            json!({ "role": "user", "content": text }),
        ];
        let options = ChatOptions {
            temperature: 0.0,
            tools: Some(detector_tool()),
            json_mode: true,
            reasoning_effort: Some("low"),
        };
        let completion = self.chat.complete(&messages, &options).await?;

        let language = completion
            .tool_argument(DETECTOR_FUNCTION, DETECTOR_PARAMETER)
            .and_then(|answer| answer.parse::<LanguageChoice>().ok())
            .unwrap_or(LanguageChoice::English);
        info!(%language, "Language resolved by chat model");
        Ok(language)
    }

    pub async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, TranslateError> {
        if !self.chat.is_configured() {
            return Err(TranslateError::NotConfigured);
        }

        let detected = self.get_language(&request.text).await?;
        let glossary = self.terms.pipe_table(detected, request.target_language);

        let messages = [
            json!({ "role": "system", "content": translator_prompt(request.target_language, &glossary) }),
            json!({ "role": "user", "content": request.text }),
        ];
        let completion = self.chat.complete(&messages, &ChatOptions::default()).await?;
        let translated_text = completion
            .content()
            .map(str::to_string)
            .ok_or(TranslateError::EmptyCompletion)?;

        info!(from = %detected, to = %request.target_language, "Text translated");
        Ok(TranslateResponse {
            translated_text,
            language_detected: detected.column(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_glossary_when_present() {
        let prompt = translator_prompt(LanguageChoice::Chinese, "| ENGLISH | CHINESE |\n");
        assert!(prompt.contains("into chinese"));
        assert!(prompt.contains("| ENGLISH | CHINESE |"));

        let bare = translator_prompt(LanguageChoice::Malay, "");
        assert!(!bare.contains("glossary"));
    }

    #[test]
    fn detector_tool_restricts_answers() {
        let tool = detector_tool();
        assert_eq!(tool[0]["function"]["name"], "language_detector");
        assert_eq!(
            tool[0]["function"]["parameters"]["properties"]["language"]["enum"][3],
            "tamil"
        );
    }
}
