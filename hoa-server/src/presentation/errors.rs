//! Mapping of failures to HTTP responses

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use hoa_core::application::ApplicationError;
use hoa_core::domain::billing::PaymentError;
use hoa_core::domain::community::CommunityStoreError;
use hoa_core::domain::export::ExportError;
use hoa_core::domain::mail::EmailError;
use hoa_core::infrastructure::rate_limiter::RateLimitResult;
use hoa_llm::LlmError;

use crate::presentation::models::ErrorResponse;

/// Message shown whenever a paid capability is missing
pub const UPGRADE_MESSAGE: &str = "Upgrade to export or email.";

/// Every failure a controller can return
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Letter generation failed: {0}")]
    Generation(#[from] LlmError),
}

impl ApiError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Application(error) => match error {
                ApplicationError::RateLimited { result } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMIT_EXCEEDED",
                    format!(
                        "Rate limit exceeded. Please retry after {} seconds.",
                        result.retry_after.unwrap_or(1)
                    ),
                ),
                ApplicationError::UpgradeRequired { .. } => (
                    StatusCode::PAYMENT_REQUIRED,
                    "UPGRADE_REQUIRED",
                    UPGRADE_MESSAGE.to_string(),
                ),
                ApplicationError::InvalidInput { message } => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", message.clone())
                }
                ApplicationError::NotConfigured { service } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_NOT_CONFIGURED",
                    format!("{service} is not configured"),
                ),
                ApplicationError::Payment(e) => match e {
                    PaymentError::SessionNotFound { .. } => (
                        StatusCode::NOT_FOUND,
                        "SESSION_NOT_FOUND",
                        "Checkout session not found".to_string(),
                    ),
                    PaymentError::MissingPrice { .. } => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "SERVICE_NOT_CONFIGURED",
                        "Pricing is not configured".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "PAYMENT_PROVIDER_ERROR",
                        "Payment provider request failed".to_string(),
                    ),
                },
                ApplicationError::Email(e) => match e {
                    EmailError::InvalidRecipient { .. } => (
                        StatusCode::BAD_REQUEST,
                        "INVALID_RECIPIENT",
                        "Recipient address is not valid".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "EMAIL_PROVIDER_ERROR",
                        "Email could not be sent".to_string(),
                    ),
                },
                ApplicationError::Community(e) => match e {
                    CommunityStoreError::Invalid { reason } => {
                        (StatusCode::BAD_REQUEST, "INVALID_INPUT", reason.clone())
                    }
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "COMMUNITY_STORE_ERROR",
                        "Community store request failed".to_string(),
                    ),
                },
                ApplicationError::Export(e) => match e {
                    ExportError::UnknownFormat { format } => (
                        StatusCode::BAD_REQUEST,
                        "UNSUPPORTED_FORMAT",
                        format!("Unsupported export format: {format}"),
                    ),
                    ExportError::Unsupported { format } => (
                        StatusCode::NOT_IMPLEMENTED,
                        "FORMAT_NOT_AVAILABLE",
                        format!("Export to {format} is not available"),
                    ),
                    ExportError::Encoding { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXPORT_ERROR",
                        "Export error".to_string(),
                    ),
                },
            },
            ApiError::Generation(e) => match e {
                LlmError::Timeout => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "GENERATION_TIMEOUT",
                    "Letter generation timed out".to_string(),
                ),
                LlmError::EmptyCompletion => (
                    StatusCode::BAD_GATEWAY,
                    "EMPTY_GENERATION",
                    e.to_string(),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_FAILED",
                    "Letter generation failed".to_string(),
                ),
            },
        }
    }

    fn rate_limit(&self) -> Option<&RateLimitResult> {
        match self {
            ApiError::Application(ApplicationError::RateLimited { result }) => Some(result),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                http_status = %status,
                error_code = code,
                "Server error mapped to HTTP response"
            );
        } else {
            tracing::warn!(
                error = %self,
                http_status = %status,
                error_code = code,
                "Client error mapped to HTTP response"
            );
        }

        // Upstream failures are all 5xx; their provider text stays in the log above.
        let details = match self.rate_limit() {
            Some(result) => Some(serde_json::json!({
                "retry_after": result.retry_after.unwrap_or(1),
                "limit": result.limit,
                "remaining": result.remaining,
            })),
            None if status.is_server_error() => None,
            None => Some(serde_json::json!({ "error": self.to_string() })),
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
            details,
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };

        let mut response = (status, Json(body.clone())).into_response();
        // Kept so the sanitizing middleware can re-render without the details.
        response.extensions_mut().insert(body);

        if let Some(result) = self.rate_limit() {
            add_rate_limit_headers(&mut response, result);
        }
        response
    }
}

fn add_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();
    headers.insert("ratelimit-limit", HeaderValue::from(result.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(result.remaining));
    if let Ok(val) = HeaderValue::from_str(&result.retry_after.unwrap_or(1).to_string()) {
        headers.insert("retry-after", val);
    }
}
