//! HOA Letters - Main application library
//!
//! Wires configuration, the entitlement core, collaborators and the HTTP surface
//! into one router.

mod app;

pub use app::{AppHandle, create_app, create_app_with_clock};
pub use hoa_core::{Config, init_tracing};
pub use hoa_server::AppState;

// Re-export for convenience
pub use hoa_core;
pub use hoa_llm;
pub use hoa_server;
