//! Checkout and payment confirmation controllers

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};

use hoa_core::application::ApplicationError;
use hoa_core::domain::entitlement::GrantMode;

use crate::presentation::controllers::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::input::{parse_body, safe_str};
use crate::presentation::models::{
    CheckoutRequest, CheckoutResponse, ErrorResponse, VerifyPaymentQuery, VerifyPaymentResponse,
};

const PAYMENTS: &str = "Payments";

/// POST /api/checkout - Start a hosted checkout
#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = "billing",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Redirect URL for the checkout page", body = CheckoutResponse),
        (status = 502, description = "Payment provider failed", body = ErrorResponse),
        (status = 503, description = "Payments are not configured", body = ErrorResponse)
    )
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let body = parse_body(&body);
    let mode = GrantMode::from_loose(&safe_str(&body["paymentMode"], 32));

    let use_case = state
        .checkout
        .as_ref()
        .ok_or(ApplicationError::NotConfigured { service: PAYMENTS })?;
    let url = use_case.execute(mode).await?;

    Ok(Json(CheckoutResponse { url }))
}

/// POST /api/verify-payment - Confirm a checkout session and issue the grant
///
/// On a paid session the response carries the new `hoa_entitlements` cookie.
/// A second purchase replaces any earlier token; credits do not stack.
#[utoipa::path(
    post,
    path = "/api/verify-payment",
    tag = "billing",
    params(VerifyPaymentQuery),
    responses(
        (status = 200, description = "Session status; sets the entitlement cookie when paid", body = VerifyPaymentResponse),
        (status = 400, description = "Missing session_id", body = ErrorResponse),
        (status = 404, description = "Unknown checkout session", body = ErrorResponse),
        (status = 503, description = "Payments are not configured", body = ErrorResponse)
    )
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Query(query): Query<VerifyPaymentQuery>,
) -> Result<Response, ApiError> {
    let session_id = query.session_id.unwrap_or_default();
    if session_id.trim().is_empty() {
        return Err(ApplicationError::invalid_input("Missing session_id").into());
    }

    let use_case = state
        .verify_payment
        .as_ref()
        .ok_or(ApplicationError::NotConfigured { service: PAYMENTS })?;
    let result = use_case.execute(&session_id).await?;

    let session = result.session;
    let mut response = Json(VerifyPaymentResponse {
        paid: session.paid,
        mode: session.mode.map(|m| m.as_str().to_string()),
        customer_id: session.customer_id,
        subscription_id: session.subscription_id,
    })
    .into_response();
    state.attach_grant(&mut response, result.grant);

    Ok(response)
}
