//! Application error type

use thiserror::Error;

use crate::domain::billing::PaymentError;
use crate::domain::community::CommunityStoreError;
use crate::domain::entitlement::Capability;
use crate::domain::export::ExportError;
use crate::domain::mail::EmailError;
use crate::infrastructure::rate_limiter::RateLimitResult;

/// Failures a use case reports to its caller
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Caller exceeded the limit for a protected action
    #[error("Too many requests")]
    RateLimited { result: RateLimitResult },

    /// Caller lacks the capability; paying would unlock it
    #[error("Capability {capability} requires payment")]
    UpgradeRequired { capability: Capability },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A collaborator was left unconfigured at startup
    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Community(#[from] CommunityStoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ApplicationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
