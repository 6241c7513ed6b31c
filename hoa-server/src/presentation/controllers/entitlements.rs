//! Entitlement lookup controller

use axum::{extract::State, response::Json};

use hoa_core::domain::entitlement::Entitlements;

use crate::presentation::controllers::AppState;
use crate::presentation::extractors::EntitlementCookie;

/// GET /api/entitlements - Capabilities for the caller's cookie
///
/// Absent, tampered and expired cookies all read as unpaid.
#[utoipa::path(
    get,
    path = "/api/entitlements",
    tag = "entitlements",
    responses(
        (status = 200, description = "Current capability set", body = Entitlements)
    )
)]
pub async fn get_entitlements(
    State(state): State<AppState>,
    cookie: EntitlementCookie,
) -> Json<Entitlements> {
    Json(state.guard.entitlements(cookie.token()))
}
