use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageChoice {
    English,
    Chinese,
    Malay,
    Tamil,
    Unknown,
}

impl LanguageChoice {
    pub const SUPPORTED: [LanguageChoice; 4] = [
        LanguageChoice::English,
        LanguageChoice::Chinese,
        LanguageChoice::Malay,
        LanguageChoice::Tamil,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageChoice::English => "english",
            LanguageChoice::Chinese => "chinese",
            LanguageChoice::Malay => "malay",
            LanguageChoice::Tamil => "tamil",
            LanguageChoice::Unknown => "unknown",
        }
    }

    /// ISO 639-1 code.
    pub fn iso_639_1(&self) -> Option<&'static str> {
        match self {
            LanguageChoice::English => Some("en"),
            LanguageChoice::Chinese => Some("zh"),
            LanguageChoice::Malay => Some("ms"),
            LanguageChoice::Tamil => Some("ta"),
            LanguageChoice::Unknown => None,
        }
    }

    /// Neural voice used when reading text back in this language.
    pub fn synthesis_voice(&self) -> Option<&'static str> {
        match self {
            LanguageChoice::English => Some("en-US-EmmaNeural"),
            LanguageChoice::Chinese => Some("zh-CN-XiaoxiaoNeural"),
            LanguageChoice::Malay => Some("ms-MY-YasminNeural"),
            LanguageChoice::Tamil => Some("ta-SG-VenbaNeural"),
            LanguageChoice::Unknown => None,
        }
    }

    /// Column heading in the official terms glossary.
    pub fn column(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(LanguageChoice::English),
            "chinese" => Ok(LanguageChoice::Chinese),
            "malay" => Ok(LanguageChoice::Malay),
            "tamil" => Ok(LanguageChoice::Tamil),
            "unknown" => Ok(LanguageChoice::Unknown),
            other => Err(format!("Unknown language '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_codes_and_voices() {
        assert_eq!(LanguageChoice::Chinese.iso_639_1(), Some("zh"));
        assert_eq!(LanguageChoice::Tamil.synthesis_voice(), Some("ta-SG-VenbaNeural"));
        assert_eq!(LanguageChoice::Unknown.iso_639_1(), None);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Malay".parse::<LanguageChoice>().unwrap(), LanguageChoice::Malay);
        assert!("klingon".parse::<LanguageChoice>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LanguageChoice::English).unwrap(), "\"english\"");
        assert_eq!(LanguageChoice::English.column(), "ENGLISH");
    }
}
