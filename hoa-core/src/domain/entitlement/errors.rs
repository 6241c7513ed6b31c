//! Entitlement domain errors

use thiserror::Error;

/// Errors raised while setting up entitlement signing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// No usable signing key was provided
    #[error("Entitlement signing secret is missing or empty")]
    MissingSecret,
}

/// Why a presented token was not accepted.
///
/// Callers outside the codec only ever see "no entitlement"; the reason is kept
/// for logging.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("token is not of the form payload.signature")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token payload is not a valid entitlement state")]
    InvalidPayload,

    #[error("token has expired")]
    Expired,
}
