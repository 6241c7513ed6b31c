//! Entitlement domain
//!
//! An [`EntitlementState`] is the payment-derived fact a caller carries around in
//! a signed token. [`Entitlements`] is the capability set derived from it.

pub mod capabilities;
pub mod errors;
pub mod state;

pub use capabilities::{Capability, Entitlements};
pub use errors::{EntitlementError, TokenRejection};
pub use state::{EntitlementState, GrantMode, ONE_TIME_GRANT_TTL_MS, SUBSCRIPTION_GRANT_TTL_MS};
