pub mod chat;
pub mod translator;

pub use chat::{ChatClient, ChatCompletion, ChatOptions};
pub use translator::Translator;
