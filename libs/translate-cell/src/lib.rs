pub mod detection;
pub mod handlers;
pub mod language;
pub mod models;
pub mod router;
pub mod services;
pub mod terms;

pub use language::LanguageChoice;
pub use models::*;
pub use router::{translate_routes, translator_routes};
pub use services::{ChatClient, Translator};
pub use terms::OfficialTerms;
