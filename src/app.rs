//! Application setup and wiring

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio_util::sync::CancellationToken;

use hoa_core::Config;
use hoa_core::application::PaidActionGuard;
use hoa_core::domain::community::CommunityStore;
use hoa_core::infrastructure::billing::StripePaymentProvider;
use hoa_core::infrastructure::community::{InMemoryCommunityStore, SupabaseCommunityStore};
use hoa_core::infrastructure::mail::SendGridEmailSender;
use hoa_core::infrastructure::{
    Clock, EntitlementCodec, EntitlementGate, GrantIssuer, RateLimiterService, SystemClock,
};
use hoa_llm::OpenAiTextGenerator;
use hoa_server::{AppState, create_router};

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// Create the application router with the system clock.
///
/// Must be called from within a Tokio runtime: the rate limiter sweep is spawned here.
pub fn create_app(config: Config) -> anyhow::Result<AppHandle> {
    create_app_with_clock(config, Arc::new(SystemClock))
}

/// Create the application router reading time from `clock`
pub fn create_app_with_clock(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<AppHandle> {
    let config_arc = Arc::new(config.clone());
    let shutdown_token = CancellationToken::new();

    let secret = config
        .signing_secret()
        .context("A signing secret is required: set ENTITLEMENTS_SECRET (or STRIPE_WEBHOOK_SECRET)")?;
    let codec = EntitlementCodec::new(secret, clock.clone())
        .context("Failed to initialize entitlement codec")?;
    let gate = EntitlementGate::new(codec.clone(), config.entitlements.paywall_enforced);
    let grants = GrantIssuer::new(codec);

    if !config.entitlements.paywall_enforced {
        tracing::warn!("Paywall enforcement is disabled; any valid entitlement unlocks paid features");
    }

    let rate_limiter = Arc::new(RateLimiterService::new(
        config.rate_limit.clone(),
        clock.clone(),
    ));
    if rate_limiter.is_enabled() {
        rate_limiter.start_cleanup_task(shutdown_token.clone());
        tracing::info!(
            cleanup_interval_seconds = config.rate_limit.cleanup_interval_seconds,
            "Rate limiter initialized (process-local buckets)"
        );
    } else {
        tracing::warn!("Rate limiting is disabled");
    }

    let communities: Arc<dyn CommunityStore> =
        match SupabaseCommunityStore::from_config(&config.communities) {
            Some(store) => {
                tracing::info!("Using Supabase community store");
                Arc::new(store)
            }
            None => {
                tracing::info!("Using in-memory community store");
                Arc::new(InMemoryCommunityStore::new())
            }
        };

    let mut state = AppState::new(
        PaidActionGuard::new(rate_limiter, gate),
        grants,
        clock,
        communities,
    );

    match StripePaymentProvider::from_config(&config.payments) {
        Some(provider) => state = state.with_payments(Arc::new(provider)),
        None => tracing::warn!("STRIPE_SECRET_KEY not set; checkout and payment verification are disabled"),
    }

    match OpenAiTextGenerator::from_config(&config.llm) {
        Some(generator) => {
            tracing::info!(model = generator.model(), "Letter generation enabled");
            state = state.with_generator(Arc::new(generator));
        }
        None => tracing::warn!("OPENAI_API_KEY not set; letter generation is disabled"),
    }

    match SendGridEmailSender::from_config(&config.email) {
        Some(sender) => state = state.with_mailer(Arc::new(sender)),
        None => tracing::warn!("SENDGRID_API_KEY or FROM_EMAIL not set; email delivery is disabled"),
    }

    let router = create_router(state, config_arc);

    Ok(AppHandle {
        router,
        shutdown_token,
    })
}
