//! SendGrid v3 mail client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::EmailConfig;
use crate::domain::mail::{EmailError, EmailSender, OutgoingEmail, looks_like_email};

pub struct SendGridEmailSender {
    client: Client,
    api_key: String,
    from_address: String,
    base_url: String,
}

impl SendGridEmailSender {
    pub fn new(
        api_key: impl Into<String>,
        from_address: impl Into<String>,
        config: &EmailConfig,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build SendGrid HTTP client, using default client");
                Client::new()
            });

        Self {
            client,
            api_key: api_key.into(),
            from_address: from_address.into(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from configuration; `None` unless both the key and sender are set
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        let key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
        let from = config
            .from_address
            .as_deref()
            .filter(|f| !f.trim().is_empty())?;
        Some(Self::new(key, from, config))
    }
}

#[async_trait]
impl EmailSender for SendGridEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if !looks_like_email(&email.to) {
            return Err(EmailError::InvalidRecipient {
                address: email.to.clone(),
            });
        }

        let body = SendGridMail {
            personalizations: vec![Personalization {
                to: vec![Address { email: &email.to }],
            }],
            from: Address {
                email: &self.from_address,
            },
            reply_to: email
                .reply_to
                .as_deref()
                .filter(|r| looks_like_email(r))
                .map(|email| Address { email }),
            subject: &email.subject,
            content: vec![Content {
                kind: "text/plain",
                value: &email.text,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Transport {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, "SendGrid API error: {}", message);
            return Err(EmailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        info!("Email handed to SendGrid");
        Ok(())
    }
}

// === SendGrid API Types ===

#[derive(Serialize)]
struct SendGridMail<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}
