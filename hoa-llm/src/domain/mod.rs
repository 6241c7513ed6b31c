//! Domain types for text generation

pub mod error;
pub mod provider;

pub use error::LlmError;
pub use provider::TextGenerator;
