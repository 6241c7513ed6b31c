//! HOA Server - HTTP surface for the HOA letter service
//!
//! Exposes letter generation, export, email delivery and checkout over axum.
//! Paid actions are gated by the signed `hoa_entitlements` cookie and throttled
//! per client with the sliding-window limiter from `hoa-core`.
//!
//! ```text
//! request ──> logging ──> security headers ──> CORS ──> timeout ──> controller
//!                                                                     │
//!                               throttle ─> authorize ─> action ─> settle (Set-Cookie)
//! ```

pub mod presentation;

pub use presentation::{ApiDoc, AppState, create_router};
