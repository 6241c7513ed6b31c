//! Letter delivery controller

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Json, Response},
};

use hoa_core::application::ApplicationError;
use hoa_core::domain::entitlement::Capability;
use hoa_core::domain::mail::{EmailError, EmailSender, OutgoingEmail, looks_like_email};
use hoa_core::infrastructure::rate_limiter::ProtectedAction;

use crate::presentation::controllers::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ClientIp, EntitlementCookie};
use crate::presentation::input::{parse_body, safe_opt, safe_str, safe_str_or};
use crate::presentation::models::{ErrorResponse, OkResponse, SendEmailRequest};

/// POST /api/email - Send the letter to a recipient
///
/// Throttled per client and per client+recipient.
#[utoipa::path(
    post,
    path = "/api/email",
    tag = "letters",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email accepted by the provider; may replace the entitlement cookie", body = OkResponse),
        (status = 400, description = "Missing or invalid recipient or body", body = ErrorResponse),
        (status = 402, description = "Upgrade required", body = ErrorResponse),
        (status = 429, description = "Too many emails", body = ErrorResponse),
        (status = 502, description = "Email provider failed", body = ErrorResponse),
        (status = 503, description = "Email is not configured", body = ErrorResponse)
    )
)]
pub async fn send_email(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    cookie: EntitlementCookie,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = parse_body(&body);
    let email = OutgoingEmail {
        to: safe_str(&body["to"], 254),
        subject: safe_str_or(&body["subject"], 200, "HOA Notice"),
        text: safe_str(&body["body"], 20_000),
        reply_to: safe_opt(&body["replyTo"], 254),
    };

    state
        .guard
        .throttle(ProtectedAction::Email, &ip, None)
        .await?;
    state
        .guard
        .throttle(ProtectedAction::EmailRecipient, &ip, Some(&email.to))
        .await?;

    let decision = state.guard.authorize(cookie.token(), Capability::Email)?;

    if email.to.is_empty() {
        return Err(ApplicationError::invalid_input("Missing recipient").into());
    }
    if !looks_like_email(&email.to) {
        return Err(ApplicationError::from(EmailError::InvalidRecipient {
            address: email.to.clone(),
        })
        .into());
    }
    if email.text.is_empty() {
        return Err(ApplicationError::invalid_input("Missing email body").into());
    }

    let mailer = state
        .mailer
        .as_ref()
        .ok_or(ApplicationError::NotConfigured { service: "Email" })?;
    mailer.send(&email).await.map_err(ApplicationError::from)?;

    tracing::info!(subject = %email.subject, "Letter emailed");
    let mut response = Json(OkResponse::ok()).into_response();
    state.attach_grant(&mut response, state.guard.settle(decision.state.as_ref()));

    Ok(response)
}
