//! HOA Core - Foundation crate for the HOA letter service
//!
//! This crate owns everything that is not HTTP plumbing:
//!
//! # Modules
//!
//! - [`config`]: Strongly-typed configuration with file and environment variable support
//! - [`domain`]: Entitlement state, capability policy, and collaborator contracts
//! - [`application`]: Paid-action guard, use cases and their shared error type
//! - [`infrastructure`]: Token codec, grants, gate, rate limiter, and collaborator clients
//! - [`logging`]: Structured logging with tracing
//!
//! # Entitlements
//!
//! Paid access is carried by the caller as a signed, self-describing token. There is
//! no server-side session store:
//!
//! ```text
//! payment confirmed ──> GrantIssuer ──> token (cookie)
//!                                          │
//! protected action ──> rate limiter ──> EntitlementGate ──> action ──> consume + re-sign
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use hoa_core::Config;
//!
//! let config = Config::load()?;
//! ```
//!
//! Environment variables use the `HOA__` prefix with double underscore separators:
//!
//! ```bash
//! HOA__SERVER__PORT=8080
//! HOA__RATE_LIMIT__EXPORT__LIMIT=5
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
