//! Offline language identification for the four supported languages, backed
//! by lingua's n-gram models. The models load lazily on first use, so one
//! detector is built per process and shared.

use lingua::{Language, LanguageDetectorBuilder};

use crate::language::LanguageChoice;

const SUPPORTED: [(Language, LanguageChoice); 4] = [
    (Language::English, LanguageChoice::English),
    (Language::Chinese, LanguageChoice::Chinese),
    (Language::Malay, LanguageChoice::Malay),
    (Language::Tamil, LanguageChoice::Tamil),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub language: LanguageChoice,
    /// Between 0 and 1.
    pub confidence: f64,
}

fn choice_of(language: Language) -> LanguageChoice {
    SUPPORTED
        .iter()
        .find(|(candidate, _)| *candidate == language)
        .map(|(_, choice)| *choice)
        .unwrap_or(LanguageChoice::Unknown)
}

pub struct LanguageDetector {
    inner: lingua::LanguageDetector,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let languages = SUPPORTED.map(|(language, _)| language);
        Self {
            inner: LanguageDetectorBuilder::from_languages(&languages).build(),
        }
    }

    /// Most likely language and its confidence. Text without letters is `Unknown`.
    pub fn detect(&self, text: &str) -> Detection {
        let Some(language) = self.inner.detect_language_of(text) else {
            return Detection {
                language: LanguageChoice::Unknown,
                confidence: 0.0,
            };
        };

        let confidence = self
            .inner
            .compute_language_confidence_values(text)
            .first()
            .map(|(_, value)| *value)
            .unwrap_or(0.0);

        Detection {
            language: choice_of(language),
            confidence,
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_text_is_chinese() {
        let detection = LanguageDetector::new().detect("我想预约流感疫苗");
        assert_eq!(detection.language, LanguageChoice::Chinese);
        assert!(detection.confidence > 0.9);
    }

    #[test]
    fn tamil_script_is_tamil() {
        let detection = LanguageDetector::new().detect("நான் தடுப்பூசி போட விரும்புகிறேன்");
        assert_eq!(detection.language, LanguageChoice::Tamil);
        assert!(detection.confidence > 0.9);
    }

    #[test]
    fn english_sentence_scores_high() {
        let detection = LanguageDetector::new().detect("I want to book a flu vaccine for my mother");
        assert_eq!(detection.language, LanguageChoice::English);
        assert!(detection.confidence > 0.7);

        let short = LanguageDetector::new().detect("Vaccination appointment tomorrow morning");
        assert_eq!(short.language, LanguageChoice::English);
    }

    #[test]
    fn malay_sentences_are_malay() {
        let detector = LanguageDetector::new();
        for text in [
            "Saya mahu tempah suntikan untuk anak saya",
            "Tempah slot vaksinasi esok pagi",
        ] {
            assert_eq!(detector.detect(text).language, LanguageChoice::Malay, "{}", text);
        }
    }

    #[test]
    fn digits_only_is_unknown() {
        let detection = LanguageDetector::new().detect("12345 !!");
        assert_eq!(detection.language, LanguageChoice::Unknown);
        assert_eq!(detection.confidence, 0.0);
    }
}
