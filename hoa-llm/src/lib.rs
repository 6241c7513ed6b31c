//! HOA LLM - Text generation for letter drafting
//!
//! A provider-agnostic [`TextGenerator`] contract, an OpenAI-compatible
//! implementation, and the prompt used to draft notices.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::prompts::{LetterFields, LetterPrompt};
pub use infrastructure::providers::OpenAiTextGenerator;
