pub mod speech_to_text;

pub use speech_to_text::SpeechToText;
