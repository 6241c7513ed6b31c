//! Payment provider contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entitlement::GrantMode;

/// Outcome of looking up a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Payment confirmed by the provider
    pub paid: bool,
    /// How the session was paid, when the provider reports it
    pub mode: Option<GrantMode>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

/// Statuses the provider uses for a settled session
pub const PAID_STATUSES: [&str; 3] = ["paid", "complete", "active"];

/// Whether a provider status string means the money is in
pub fn is_paid_status(status: &str) -> bool {
    PAID_STATUSES
        .iter()
        .any(|paid| paid.eq_ignore_ascii_case(status.trim()))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// No price is configured for the requested mode
    #[error("No price configured for {mode} checkout")]
    MissingPrice { mode: GrantMode },

    /// Session id does not exist at the provider
    #[error("Checkout session not found: {id}")]
    SessionNotFound { id: String },

    /// Provider rejected the request
    #[error("Payment provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// Network or decoding failure
    #[error("Payment provider unreachable: {message}")]
    Transport { message: String },
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session and return its redirect URL
    async fn create_checkout_session(&self, mode: GrantMode) -> Result<String, PaymentError>;

    /// Look up a checkout session by id
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_statuses() {
        assert!(is_paid_status("paid"));
        assert!(is_paid_status("Complete"));
        assert!(is_paid_status("active"));
        assert!(!is_paid_status("unpaid"));
        assert!(!is_paid_status("open"));
        assert!(!is_paid_status(""));
    }
}
