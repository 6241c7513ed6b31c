//! Letter drafting controller

use axum::{body::Bytes, extract::State, response::Json};
use serde_json::Value;

use hoa_core::application::ApplicationError;
use hoa_core::domain::entitlement::Capability;
use hoa_core::infrastructure::rate_limiter::ProtectedAction;
use hoa_llm::{LetterFields, LetterPrompt, LlmError, TextGenerator};

use crate::presentation::controllers::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::extractors::{ClientIp, EntitlementCookie};
use crate::presentation::input::{parse_body, safe_str, safe_str_or};
use crate::presentation::models::{ErrorResponse, GenerateLetterRequest, GenerateLetterResponse};

/// Coerce the drafting form into clamped prompt fields
pub fn letter_fields(body: &Value) -> LetterFields {
    LetterFields {
        violation_type: safe_str_or(&body["violationType"], 64, "Other"),
        tone: safe_str_or(&body["tone"], 32, "Neutral"),
        due_date: safe_str(&body["dueDate"], 80),
        community_name: safe_str(&body["communityName"], 80),
        rule_ref: safe_str(&body["ruleRef"], 120),
        details: safe_str(&body["details"], 800),
    }
}

/// POST /api/generate - Draft a violation letter
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "letters",
    request_body = GenerateLetterRequest,
    responses(
        (status = 200, description = "Drafted letter", body = GenerateLetterResponse),
        (status = 429, description = "Too many generation requests", body = ErrorResponse),
        (status = 502, description = "Text generation failed or returned nothing", body = ErrorResponse),
        (status = 503, description = "Text generation is not configured", body = ErrorResponse)
    )
)]
pub async fn generate_letter(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    cookie: EntitlementCookie,
    body: Bytes,
) -> Result<Json<GenerateLetterResponse>, ApiError> {
    state
        .guard
        .throttle(ProtectedAction::Generate, &ip, None)
        .await?;
    state.guard.authorize(cookie.token(), Capability::Generate)?;

    let generator = state
        .generator
        .as_ref()
        .ok_or(ApplicationError::NotConfigured {
            service: "Letter generation",
        })?;

    let fields = letter_fields(&parse_body(&body));
    let prompt = LetterPrompt::build(&fields);
    let completion = generator.complete(&prompt.system, &prompt.user).await?;

    let letter = completion.trim();
    if letter.is_empty() {
        return Err(LlmError::EmptyCompletion.into());
    }

    tracing::info!(
        provider = generator.name(),
        violation_type = %fields.violation_type,
        chars = letter.len(),
        "Letter generated"
    );
    Ok(Json(GenerateLetterResponse {
        letter: letter.to_string(),
    }))
}
