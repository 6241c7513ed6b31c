//! Letter export controller

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use hoa_core::application::ApplicationError;
use hoa_core::domain::export::ExportFormat;
use hoa_core::infrastructure::rate_limiter::ProtectedAction;

use crate::presentation::controllers::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ClientIp, EntitlementCookie};
use crate::presentation::input::{parse_body, safe_file_name, safe_opt};
use crate::presentation::models::{ErrorResponse, ExportLetterRequest};

/// POST /api/export/{format} - Download the letter as a document
///
/// Spends one credit of a one-time grant once the document has been encoded.
#[utoipa::path(
    post,
    path = "/api/export/{format}",
    tag = "letters",
    params(
        ("format" = String, Path, description = "txt, docx or pdf")
    ),
    request_body = ExportLetterRequest,
    responses(
        (status = 200, description = "Document attachment; may replace the entitlement cookie", content_type = "application/octet-stream"),
        (status = 400, description = "Unknown format or missing letter", body = ErrorResponse),
        (status = 402, description = "Upgrade required", body = ErrorResponse),
        (status = 429, description = "Too many exports", body = ErrorResponse),
        (status = 501, description = "No encoder registered for the format", body = ErrorResponse)
    )
)]
pub async fn export_letter(
    State(state): State<AppState>,
    Path(format): Path<String>,
    ClientIp(ip): ClientIp,
    cookie: EntitlementCookie,
    body: Bytes,
) -> Result<Response, ApiError> {
    state
        .guard
        .throttle(ProtectedAction::Export, &ip, None)
        .await?;

    let format: ExportFormat = format.parse().map_err(ApplicationError::from)?;
    let decision = state.guard.authorize(cookie.token(), format.capability())?;

    let body = parse_body(&body);
    let letter = body["letter"].as_str().unwrap_or_default();
    if letter.trim().is_empty() {
        return Err(ApplicationError::invalid_input("Missing letter content").into());
    }

    let base_name = safe_opt(&body["fileName"], 120)
        .or_else(|| safe_opt(&body["violationType"], 64))
        .unwrap_or_default();
    let file_name = format!("{}.{}", safe_file_name(&base_name), format.extension());

    let bytes = state
        .exporters
        .encode(format, letter)
        .map_err(ApplicationError::from)?;

    let mut response = bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.content_type()),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename={file_name}")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    tracing::info!(format = %format, file_name = %file_name, "Letter exported");
    state.attach_grant(&mut response, state.guard.settle(decision.state.as_ref()));

    Ok(response)
}
