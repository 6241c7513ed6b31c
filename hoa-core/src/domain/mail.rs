//! Outbound email contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A plain-text message addressed to a single recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmailError {
    #[error("Invalid recipient address: {address}")]
    InvalidRecipient { address: String },

    #[error("Email provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Email provider unreachable: {message}")]
    Transport { message: String },
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// Loose address check: one '@' with something on both sides and a dot in the domain
pub fn looks_like_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
}
