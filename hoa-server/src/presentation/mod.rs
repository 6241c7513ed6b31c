//! Presentation layer

pub mod controllers;
pub mod errors;
pub mod extractors;
pub mod input;
pub mod middleware;
pub mod models;
pub mod routes;

pub use controllers::AppState;
pub use errors::ApiError;
pub use extractors::{ClientIp, ENTITLEMENT_COOKIE, EntitlementCookie};
pub use models::*;
pub use routes::{ApiDoc, create_router};
