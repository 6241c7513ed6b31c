//! Integration tests for the Stripe, SendGrid and Supabase clients using wiremock

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hoa_core::domain::billing::{PaymentError, PaymentProvider};
use hoa_core::domain::community::{CommunityStore, CommunityStoreError, NewCommunity};
use hoa_core::domain::entitlement::GrantMode;
use hoa_core::domain::mail::{EmailError, EmailSender, OutgoingEmail};
use hoa_core::infrastructure::billing::StripePaymentProvider;
use hoa_core::infrastructure::community::SupabaseCommunityStore;
use hoa_core::infrastructure::mail::SendGridEmailSender;

// =============================================================================
// Stripe
// =============================================================================

#[tokio::test]
async fn test_stripe_creates_one_time_checkout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("Authorization", "Bearer sk_test_123"))
        .and(body_string_contains("mode=payment"))
        .and(body_string_contains("price_single"))
        .and(body_string_contains("session_id%3D%7BCHECKOUT_SESSION_ID%7D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        StripePaymentProvider::from_config(&common::payments_config(&mock_server.uri())).unwrap();
    let url = provider
        .create_checkout_session(GrantMode::OneTime)
        .await
        .unwrap();

    assert_eq!(url, "https://checkout.stripe.com/c/pay/cs_test_1");
}

#[tokio::test]
async fn test_stripe_subscription_uses_subscription_price() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("mode=subscription"))
        .and(body_string_contains("price_monthly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_2",
            "url": "https://checkout.stripe.com/c/pay/cs_test_2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        StripePaymentProvider::from_config(&common::payments_config(&mock_server.uri())).unwrap();
    assert!(
        provider
            .create_checkout_session(GrantMode::Subscription)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_stripe_surfaces_api_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "No such price: 'price_single'"}
        })))
        .mount(&mock_server)
        .await;

    let provider =
        StripePaymentProvider::from_config(&common::payments_config(&mock_server.uri())).unwrap();
    let err = provider
        .create_checkout_session(GrantMode::OneTime)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PaymentError::Provider {
            status: 400,
            message: "No such price: 'price_single'".to_string()
        }
    );
}

#[tokio::test]
async fn test_stripe_retrieves_paid_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_paid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_paid",
            "mode": "payment",
            "payment_status": "paid",
            "status": "complete",
            "customer": "cus_1",
            "subscription": null
        })))
        .mount(&mock_server)
        .await;

    let provider =
        StripePaymentProvider::from_config(&common::payments_config(&mock_server.uri())).unwrap();
    let session = provider.retrieve_session("cs_paid").await.unwrap();

    assert!(session.paid);
    assert_eq!(session.mode, Some(GrantMode::OneTime));
    assert_eq!(session.customer_id.as_deref(), Some("cus_1"));
    assert!(session.subscription_id.is_none());
}

#[tokio::test]
async fn test_stripe_unknown_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No such checkout.session"}
        })))
        .mount(&mock_server)
        .await;

    let provider =
        StripePaymentProvider::from_config(&common::payments_config(&mock_server.uri())).unwrap();
    let err = provider.retrieve_session("cs_missing").await.unwrap_err();

    assert!(matches!(err, PaymentError::SessionNotFound { .. }));
}

// =============================================================================
// SendGrid
// =============================================================================

fn email(to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "HOA Notice".to_string(),
        text: "Please trim the hedge.".to_string(),
        reply_to: Some("manager@example.org".to_string()),
    }
}

#[tokio::test]
async fn test_sendgrid_sends_plain_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("Authorization", "Bearer SG.test"))
        .and(body_partial_json(json!({
            "personalizations": [{"to": [{"email": "owner@example.org"}]}],
            "from": {"email": "board@example.org"},
            "reply_to": {"email": "manager@example.org"},
            "subject": "HOA Notice",
            "content": [{"type": "text/plain", "value": "Please trim the hedge."}]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sender = SendGridEmailSender::from_config(&common::email_config(&mock_server.uri())).unwrap();
    sender.send(&email("owner@example.org")).await.unwrap();
}

#[tokio::test]
async fn test_sendgrid_rejects_bad_recipient_without_calling_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&mock_server)
        .await;

    let sender = SendGridEmailSender::from_config(&common::email_config(&mock_server.uri())).unwrap();
    let err = sender.send(&email("not-an-address")).await.unwrap_err();

    assert!(matches!(err, EmailError::InvalidRecipient { .. }));
}

#[tokio::test]
async fn test_sendgrid_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&mock_server)
        .await;

    let sender = SendGridEmailSender::from_config(&common::email_config(&mock_server.uri())).unwrap();
    let err = sender.send(&email("owner@example.org")).await.unwrap_err();

    assert_eq!(
        err,
        EmailError::Provider {
            status: 401,
            message: "unauthorized".to_string()
        }
    );
}

// =============================================================================
// Supabase
// =============================================================================

#[tokio::test]
async fn test_supabase_lists_oldest_first() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/communities"))
        .and(header("apikey", "anon-key"))
        .and(query_param("order", "created_at.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "7d9f1f3e-2b1c-4a5e-9a43-0f1f3f0c2b11",
                "name": "Maple Grove",
                "guidelines": null,
                "letterhead": "Maple Grove HOA",
                "logo_url": null,
                "created_at": "2024-05-01T12:00:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let store =
        SupabaseCommunityStore::from_config(&common::community_config(&mock_server.uri())).unwrap();
    let communities = store.list().await.unwrap();

    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].name, "Maple Grove");
    assert_eq!(communities[0].guidelines, "");
    assert_eq!(communities[0].letterhead, "Maple Grove HOA");
}

#[tokio::test]
async fn test_supabase_create_returns_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/communities"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!([{"name": "Oak Ridge"}])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {
                "id": "0b6e7c55-7f0c-4c43-8d7e-2f5d4b0f3a21",
                "name": "Oak Ridge",
                "guidelines": "Quiet hours after 10pm",
                "letterhead": "",
                "logo_url": "https://example.org/logo.png",
                "created_at": "2024-05-02T08:30:00Z"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store =
        SupabaseCommunityStore::from_config(&common::community_config(&mock_server.uri())).unwrap();
    let created = store
        .create(NewCommunity {
            name: "Oak Ridge".to_string(),
            guidelines: "Quiet hours after 10pm".to_string(),
            letterhead: String::new(),
            logo_url: Some("https://example.org/logo.png".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(created.name, "Oak Ridge");
    assert_eq!(created.logo_url.as_deref(), Some("https://example.org/logo.png"));
}

#[tokio::test]
async fn test_supabase_backend_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/communities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let store =
        SupabaseCommunityStore::from_config(&common::community_config(&mock_server.uri())).unwrap();
    let err = store.list().await.unwrap_err();

    assert!(matches!(err, CommunityStoreError::Backend { status: 500, .. }));
}
