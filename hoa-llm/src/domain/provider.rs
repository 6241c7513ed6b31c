//! Text generator abstraction

use async_trait::async_trait;

use super::error::LlmError;

/// Produces a single completion for a system/user message pair
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider identifier for logging
    fn name(&self) -> &'static str;

    /// Complete the conversation; returns the assistant text as produced
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}
