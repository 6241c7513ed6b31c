//! Stripe Checkout client
//!
//! Talks to the Stripe REST API directly with form-encoded requests.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::PaymentsConfig;
use crate::domain::billing::{CheckoutSession, PaymentError, PaymentProvider, is_paid_status};
use crate::domain::entitlement::GrantMode;

/// Stripe-backed payment provider
pub struct StripePaymentProvider {
    client: Client,
    secret_key: String,
    base_url: String,
    app_url: String,
    single_price_id: Option<String>,
    subscription_price_id: Option<String>,
}

impl StripePaymentProvider {
    pub fn new(secret_key: impl Into<String>, config: &PaymentsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build Stripe HTTP client, using default client");
                Client::new()
            });

        Self {
            client,
            secret_key: secret_key.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            app_url: config.app_url.trim_end_matches('/').to_string(),
            single_price_id: config.single_price_id.clone(),
            subscription_price_id: config.subscription_price_id.clone(),
        }
    }

    /// Build from configuration; `None` when no secret key is configured
    pub fn from_config(config: &PaymentsConfig) -> Option<Self> {
        let key = config.secret_key.as_deref().filter(|k| !k.trim().is_empty())?;
        Some(Self::new(key, config))
    }

    fn price_for(&self, mode: GrantMode) -> Result<&str, PaymentError> {
        let price = match mode {
            GrantMode::Subscription => self.subscription_price_id.as_deref(),
            GrantMode::OneTime => self.single_price_id.as_deref(),
        };
        price
            .filter(|p| !p.trim().is_empty())
            .ok_or(PaymentError::MissingPrice { mode })
    }

    async fn read_error(response: reqwest::Response) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(body);
        error!(status = %status, "Stripe API error: {}", message);
        PaymentError::Provider {
            status: status.as_u16(),
            message,
        }
    }
}

fn transport(e: reqwest::Error) -> PaymentError {
    PaymentError::Transport {
        message: e.to_string(),
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    async fn create_checkout_session(&self, mode: GrantMode) -> Result<String, PaymentError> {
        let price = self.price_for(mode)?;
        let stripe_mode = match mode {
            GrantMode::Subscription => "subscription",
            GrantMode::OneTime => "payment",
        };
        let success_url = format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", self.app_url);

        debug!(mode = %mode, "Creating Stripe checkout session");

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("mode", stripe_mode),
                ("line_items[0][price]", price),
                ("line_items[0][quantity]", "1"),
                ("success_url", success_url.as_str()),
                ("cancel_url", self.app_url.as_str()),
            ])
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let session: StripeSession = response.json().await.map_err(transport)?;
        session.url.ok_or_else(|| PaymentError::Provider {
            status: 200,
            message: "checkout session has no redirect url".to_string(),
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .get(format!("{}/v1/checkout/sessions/{}", self.base_url, session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PaymentError::SessionNotFound {
                id: session_id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let session: StripeSession = response.json().await.map_err(transport)?;
        Ok(session.into_checkout_session())
    }
}

// === Stripe API Types ===

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    status: Option<String>,
    /// Either an id or an expanded object
    #[serde(default)]
    customer: Value,
    #[serde(default)]
    subscription: Value,
}

impl StripeSession {
    fn into_checkout_session(self) -> CheckoutSession {
        let status = self
            .payment_status
            .as_deref()
            .or(self.status.as_deref())
            .unwrap_or_default();
        let mode = self.mode.as_deref().map(|m| match m {
            "subscription" => GrantMode::Subscription,
            _ => GrantMode::OneTime,
        });

        CheckoutSession {
            paid: is_paid_status(status),
            mode,
            customer_id: object_id(&self.customer),
            subscription_id: object_id(&self.subscription),
            id: self.id,
        }
    }
}

fn object_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
