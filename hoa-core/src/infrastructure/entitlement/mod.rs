//! Entitlement token signing, grants and gating

pub mod codec;
pub mod gate;
pub mod grant;

pub use codec::{EntitlementCodec, EntitlementToken};
pub use gate::{EntitlementGate, GateDecision};
pub use grant::{GrantIssuer, IssuedGrant};
