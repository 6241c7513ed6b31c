//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Error response model
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "UPGRADE_REQUIRED")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "Upgrade to export or email.")]
    pub message: String,

    /// Additional error context and debugging information
    #[schema(example = r#"{"retry_after": 60, "limit": 10, "remaining": 0}"#)]
    pub details: Option<serde_json::Value>,

    /// Unique request identifier for tracking and support
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub request_id: Uuid,

    /// Error occurrence timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,

    #[schema(example = "0.1.0")]
    pub version: String,

    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

/// Start a hosted checkout
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// "subscription" or "one-time"; anything else buys a single letter
    #[schema(example = "one-time")]
    pub payment_mode: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Provider-hosted checkout page
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_123")]
    pub url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyPaymentQuery {
    /// Checkout session id returned by the provider redirect
    pub session_id: Option<String>,
}

/// Outcome of a payment confirmation
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub paid: bool,
    #[schema(example = "one-time")]
    pub mode: Option<String>,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

/// Form fields for drafting a letter. Every field is optional and clamped.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLetterRequest {
    #[schema(example = "Landscaping")]
    pub violation_type: Option<String>,
    #[schema(example = "Friendly")]
    pub tone: Option<String>,
    #[schema(example = "June 30")]
    pub due_date: Option<String>,
    #[schema(example = "Maple Grove")]
    pub community_name: Option<String>,
    #[schema(example = "CC&R 4.2")]
    pub rule_ref: Option<String>,
    #[schema(example = "Hedge along the sidewalk is overgrown.")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateLetterResponse {
    pub letter: String,
}

/// Letter to export as a downloadable document
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportLetterRequest {
    pub letter: String,
    /// Base name of the attachment; falls back to the violation type
    #[schema(example = "hedge-notice")]
    pub file_name: Option<String>,
    pub violation_type: Option<String>,
}

/// Letter to deliver by email
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[schema(example = "owner@example.org")]
    pub to: String,
    #[schema(example = "HOA Notice")]
    pub subject: Option<String>,
    pub body: String,
    #[schema(example = "manager@example.org")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[schema(example = "Maple Grove")]
    pub name: String,
    pub guidelines: Option<String>,
    pub letterhead: Option<String>,
    pub logo_url: Option<String>,
}

/// Generic acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
