//! Infrastructure Layer - Token signing, rate limiting and external collaborators

pub mod billing;
pub mod clock;
pub mod community;
pub mod entitlement;
pub mod export;
pub mod mail;
pub mod rate_limiter;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entitlement::{EntitlementCodec, EntitlementGate, GrantIssuer};
pub use rate_limiter::RateLimiterService;
