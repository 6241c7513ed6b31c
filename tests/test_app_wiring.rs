//! Application assembly tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use hoa_letters::hoa_core::domain::entitlement::GrantMode;
use hoa_letters::hoa_core::infrastructure::{EntitlementCodec, GrantIssuer, ManualClock};
use hoa_letters::{Config, create_app, create_app_with_clock};

const NOW: i64 = 1_700_000_000_000;

fn config_with_secret(secret: &str) -> Config {
    let mut config = Config::default();
    config.entitlements.secret = Some(secret.to_string());
    config
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_secret_is_fatal() {
    let error = create_app(Config::default()).err().expect("startup must fail");
    assert!(error.to_string().contains("ENTITLEMENTS_SECRET"));
}

#[tokio::test]
async fn test_webhook_secret_is_accepted() {
    let mut config = Config::default();
    config.payments.webhook_secret = Some("whsec_fallback".to_string());
    let handle = create_app(config).unwrap();
    handle.shutdown_token.cancel();
}

#[tokio::test]
async fn test_health_is_served() {
    let handle = create_app(config_with_secret("wiring-secret")).unwrap();

    let response = handle
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    handle.shutdown_token.cancel();
}

#[tokio::test]
async fn test_configured_secret_verifies_tokens() {
    let clock = Arc::new(ManualClock::new(NOW));
    let handle =
        create_app_with_clock(config_with_secret("wiring-secret"), clock.clone()).unwrap();

    let issuer = GrantIssuer::new(EntitlementCodec::new("wiring-secret", clock.clone()).unwrap());
    let grant = issuer.grant(GrantMode::Subscription);

    let response = handle
        .router
        .clone()
        .oneshot(
            Request::get("/api/entitlements")
                .header(header::COOKIE, format!("hoa_entitlements={}", grant.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["isSubscriber"], true);
    assert_eq!(body["canEmail"], true);

    let foreign = GrantIssuer::new(EntitlementCodec::new("other-secret", clock).unwrap())
        .grant(GrantMode::Subscription);
    let response = handle
        .router
        .oneshot(
            Request::get("/api/entitlements")
                .header(header::COOKIE, format!("hoa_entitlements={}", foreign.token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await["isSubscriber"], false);

    handle.shutdown_token.cancel();
}

#[tokio::test]
async fn test_collaborators_without_keys_are_unavailable() {
    let handle = create_app(config_with_secret("wiring-secret")).unwrap();

    let response = handle
        .router
        .clone()
        .oneshot(
            Request::post("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Communities fall back to the in-memory store.
    let response = handle
        .router
        .oneshot(Request::get("/api/communities").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    handle.shutdown_token.cancel();
}
