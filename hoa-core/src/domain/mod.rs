//! Domain layer
//!
//! Pure entitlement logic plus the contracts of the external collaborators the
//! service talks to (payments, email, community profiles, document export).

pub mod billing;
pub mod community;
pub mod entitlement;
pub mod export;
pub mod mail;
