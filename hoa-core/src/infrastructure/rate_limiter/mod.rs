//! Rate Limiting Infrastructure
//!
//! Per-caller sliding-window limits for the protected actions:
//! - Every attempt is recorded, admitted or not
//! - Buckets are keyed by action and client address, optionally scoped further
//! - In-process storage with a background sweep of idle buckets

pub mod service;
pub mod sliding_window;
pub mod types;

pub use service::RateLimiterService;
pub use sliding_window::SlidingWindowLimiter;
pub use types::{ProtectedAction, RateLimitKey, RateLimitResult};
