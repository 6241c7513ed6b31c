//! Signed entitlement tokens
//!
//! Token layout: `base64url(json_state) "." base64url(hmac_sha256(secret, base64url(json_state)))`,
//! both halves unpadded. The token is the only place entitlement state lives.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::domain::entitlement::{EntitlementError, EntitlementState, TokenRejection};
use crate::infrastructure::clock::Clock;

type HmacSha256 = Hmac<Sha256>;

/// Opaque serialized entitlement state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementToken(String);

impl EntitlementToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EntitlementToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signs and verifies entitlement tokens with a server-held secret
#[derive(Clone)]
pub struct EntitlementCodec {
    mac: HmacSha256,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EntitlementCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementCodec").finish_non_exhaustive()
    }
}

impl EntitlementCodec {
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Result<Self, EntitlementError> {
        if secret.trim().is_empty() {
            return Err(EntitlementError::MissingSecret);
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| EntitlementError::MissingSecret)?;
        Ok(Self { mac, clock })
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Serialize and sign a state. Deterministic for a given secret and state.
    pub fn sign(&self, state: &EntitlementState) -> EntitlementToken {
        let json = serde_json::json!({
            "isSubscriber": state.is_subscriber,
            "expiresAt": state.expires_at,
            "remainingOneTimeCredits": state.remaining_one_time_credits,
        });
        let payload = URL_SAFE_NO_PAD.encode(json.to_string());
        let signature = URL_SAFE_NO_PAD.encode(self.signature(&payload));
        EntitlementToken(format!("{payload}.{signature}"))
    }

    /// Verify a presented token.
    ///
    /// Every failure collapses to `None`; nothing here can fail loudly.
    pub fn verify(&self, token: &str) -> Option<EntitlementState> {
        match self.decode(token) {
            Ok(state) => Some(state),
            Err(rejection) => {
                debug!(reason = %rejection, "Rejected entitlement token");
                None
            }
        }
    }

    /// Verify a token and report why it was rejected
    pub fn decode(&self, token: &str) -> Result<EntitlementState, TokenRejection> {
        let (payload, signature) = token.trim().split_once('.').ok_or(TokenRejection::Malformed)?;
        if payload.is_empty() || signature.is_empty() {
            return Err(TokenRejection::Malformed);
        }

        let presented = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenRejection::Malformed)?;
        let expected = self.signature(payload);
        if !bool::from(expected.as_slice().ct_eq(presented.as_slice())) {
            return Err(TokenRejection::BadSignature);
        }

        let raw = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenRejection::InvalidPayload)?;
        let value: Value =
            serde_json::from_slice(&raw).map_err(|_| TokenRejection::InvalidPayload)?;
        let state = normalize(&value)?;

        if !state.is_valid_at(self.clock.now_millis()) {
            return Err(TokenRejection::Expired);
        }
        Ok(state)
    }

    fn signature(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Build a state from a signed payload.
///
/// `expiresAt` must be numeric. The flag and the credit count are read
/// leniently and clamped.
fn normalize(value: &Value) -> Result<EntitlementState, TokenRejection> {
    let object = value.as_object().ok_or(TokenRejection::InvalidPayload)?;

    let expires_at = match object.get("expiresAt") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .ok_or(TokenRejection::InvalidPayload)?,
        _ => return Err(TokenRejection::InvalidPayload),
    };

    let is_subscriber = object.get("isSubscriber").is_some_and(truthy);
    let remaining_one_time_credits = object
        .get("remainingOneTimeCredits")
        .map(credit_count)
        .unwrap_or(0);

    Ok(EntitlementState {
        is_subscriber,
        expires_at,
        remaining_one_time_credits,
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn credit_count(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.floor().min(f64::from(u32::MAX)) as u32
}
