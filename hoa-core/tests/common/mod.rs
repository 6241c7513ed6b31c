//! Shared fixtures for hoa-core integration tests

#![allow(dead_code)]

use std::sync::Arc;

use hoa_core::config::{CommunityStoreConfig, EmailConfig, PaymentsConfig};
use hoa_core::infrastructure::{EntitlementCodec, ManualClock};

/// 2023-11-14T22:13:20Z
pub const NOW: i64 = 1_700_000_000_000;

pub const SECRET: &str = "integration-test-secret";

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(NOW))
}

pub fn codec(clock: Arc<ManualClock>) -> EntitlementCodec {
    EntitlementCodec::new(SECRET, clock).expect("non-empty secret")
}

pub fn payments_config(base_url: &str) -> PaymentsConfig {
    PaymentsConfig {
        secret_key: Some("sk_test_123".to_string()),
        single_price_id: Some("price_single".to_string()),
        subscription_price_id: Some("price_monthly".to_string()),
        app_url: "https://letters.example.org".to_string(),
        api_base_url: base_url.to_string(),
        ..PaymentsConfig::default()
    }
}

pub fn email_config(base_url: &str) -> EmailConfig {
    EmailConfig {
        api_key: Some("SG.test".to_string()),
        from_address: Some("board@example.org".to_string()),
        api_base_url: base_url.to_string(),
        ..EmailConfig::default()
    }
}

pub fn community_config(base_url: &str) -> CommunityStoreConfig {
    CommunityStoreConfig {
        supabase_url: Some(base_url.to_string()),
        supabase_key: Some("anon-key".to_string()),
        ..CommunityStoreConfig::default()
    }
}
