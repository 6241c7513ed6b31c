//! Shared router harness and collaborator fakes

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde_json::Value;

use hoa_core::Config;
use hoa_core::application::PaidActionGuard;
use hoa_core::domain::billing::{CheckoutSession, PaymentError, PaymentProvider};
use hoa_core::domain::entitlement::GrantMode;
use hoa_core::domain::mail::{EmailError, EmailSender, OutgoingEmail};
use hoa_core::infrastructure::community::InMemoryCommunityStore;
use hoa_core::infrastructure::{
    EntitlementCodec, EntitlementGate, GrantIssuer, ManualClock, RateLimiterService,
};
use hoa_llm::{LlmError, TextGenerator};
use hoa_server::{AppState, create_router};

pub const NOW: i64 = 1_700_000_000_000;
pub const SECRET: &str = "server-test-secret";
pub const CLIENT_IP: &str = "203.0.113.10";

/// Generator that always answers with the same text
pub struct ScriptedGenerator {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(user.to_string());
        Ok(self.reply.clone())
    }
}

/// Mailer that records instead of sending; with `fail` set every send is refused
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Provider {
                status: 500,
                message: "upstream mail relay unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Payment provider with a fixed set of sessions
pub struct FakePayments;

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_checkout_session(&self, mode: GrantMode) -> Result<String, PaymentError> {
        Ok(format!("https://checkout.test/{mode}"))
    }

    async fn retrieve_session(&self, id: &str) -> Result<CheckoutSession, PaymentError> {
        let (paid, mode) = match id {
            "cs_paid_one" => (true, GrantMode::OneTime),
            "cs_paid_sub" => (true, GrantMode::Subscription),
            "cs_open" => (false, GrantMode::OneTime),
            _ => return Err(PaymentError::SessionNotFound { id: id.to_string() }),
        };
        Ok(CheckoutSession {
            id: id.to_string(),
            paid,
            mode: Some(mode),
            customer_id: Some("cus_test".to_string()),
            subscription_id: (mode == GrantMode::Subscription).then(|| "sub_test".to_string()),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub grants: GrantIssuer,
    pub codec: EntitlementCodec,
    pub mailer: Arc<RecordingMailer>,
    pub generator: Arc<ScriptedGenerator>,
}

pub struct Options {
    pub config: Config,
    pub reply: &'static str,
    pub with_collaborators: bool,
    pub mailer_fails: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: Config::default(),
            reply: "  Dear homeowner,\n\nPlease trim the hedge.\n  ",
            with_collaborators: true,
            mailer_fails: false,
        }
    }
}

pub fn test_app() -> TestApp {
    test_app_with(Options::default())
}

pub fn test_app_with(options: Options) -> TestApp {
    let config = options.config;
    let clock = Arc::new(ManualClock::new(NOW));
    let codec = EntitlementCodec::new(SECRET, clock.clone()).unwrap();
    let gate = EntitlementGate::new(codec.clone(), config.entitlements.paywall_enforced);
    let grants = GrantIssuer::new(codec.clone());
    let limiter = Arc::new(RateLimiterService::new(
        config.rate_limit.clone(),
        clock.clone(),
    ));

    let mailer = Arc::new(RecordingMailer {
        fail: options.mailer_fails,
        ..RecordingMailer::default()
    });
    let generator = Arc::new(ScriptedGenerator {
        reply: options.reply.to_string(),
        prompts: Mutex::new(Vec::new()),
    });

    let mut state = AppState::new(
        PaidActionGuard::new(limiter, gate),
        grants.clone(),
        clock.clone(),
        Arc::new(InMemoryCommunityStore::new()),
    );
    if options.with_collaborators {
        state = state
            .with_payments(Arc::new(FakePayments))
            .with_generator(generator.clone())
            .with_mailer(mailer.clone());
    }

    TestApp {
        router: create_router(state, Arc::new(config)),
        clock,
        grants,
        codec,
        mailer,
        generator,
    }
}

pub fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", CLIENT_IP);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("hoa_entitlements={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("hoa_entitlements={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Token from the response's entitlement `Set-Cookie`, if any
pub fn issued_token(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.split(';').next()?.strip_prefix("hoa_entitlements="))
        .map(str::to_string)
}
