//! Provider implementations and prompt templates

pub mod prompts;
pub mod providers;
