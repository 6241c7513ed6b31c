//! Client analytics sink

use axum::{body::Bytes, response::Json};

use crate::presentation::models::OkResponse;

const MAX_EVENT_CHARS: usize = 4_000;

/// POST /api/analytics - Record a client event in the log
#[utoipa::path(
    post,
    path = "/api/analytics",
    tag = "analytics",
    request_body(content = String, description = "Arbitrary event payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Event recorded", body = OkResponse)
    )
)]
pub async fn record_event(body: Bytes) -> Json<OkResponse> {
    let event: String = String::from_utf8_lossy(&body)
        .chars()
        .take(MAX_EVENT_CHARS)
        .collect();
    tracing::info!(target: "analytics", event = %event, "Client event");
    Json(OkResponse::ok())
}
