//! Rate Limiter Service
//!
//! Maps protected actions to their configured limits and keys buckets by client.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::sliding_window::SlidingWindowLimiter;
use super::types::{ProtectedAction, RateLimitKey, RateLimitResult};
use crate::config::{ActionLimitConfig, RateLimitConfig};
use crate::infrastructure::clock::Clock;

/// Main rate limiter service
pub struct RateLimiterService {
    limiter: Arc<SlidingWindowLimiter>,
    config: RateLimitConfig,
}

impl RateLimiterService {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            limiter: Arc::new(SlidingWindowLimiter::new(clock)),
            config,
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn limit_for(&self, action: ProtectedAction) -> ActionLimitConfig {
        match action {
            ProtectedAction::Generate => self.config.generate,
            ProtectedAction::Export => self.config.export,
            ProtectedAction::Email => self.config.email,
            ProtectedAction::EmailRecipient => self.config.email_recipient,
        }
    }

    /// Record an attempt of `action` by `ip`, optionally narrowed by `scope`
    pub async fn check(
        &self,
        action: ProtectedAction,
        ip: &str,
        scope: Option<&str>,
    ) -> RateLimitResult {
        if !self.config.enabled {
            return RateLimitResult::unlimited();
        }

        let key = RateLimitKey::new(action, ip, scope);
        let limit = self.limit_for(action);
        let result = self
            .limiter
            .check(&key.to_bucket_key(), limit.limit, limit.window_millis())
            .await;

        if !result.allowed {
            warn!(
                action = %action,
                key = %key.to_bucket_key(),
                retry_after = result.retry_after,
                "Rate limit exceeded"
            );
        }
        result
    }

    /// Start the idle-bucket sweep; it stops when `shutdown` is cancelled
    pub fn start_cleanup_task(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        Arc::clone(&self.limiter).spawn_cleanup(
            Duration::from_secs(self.config.cleanup_interval_seconds),
            self.config.longest_window_millis(),
            shutdown,
        )
    }

    /// Get the configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;

    fn service(config: RateLimitConfig) -> (RateLimiterService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        (RateLimiterService::new(config, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_rate_limiter_disabled() {
        let config = RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        };
        let (service, _) = service(config);
        for _ in 0..100 {
            let result = service.check(ProtectedAction::Export, "1.2.3.4", None).await;
            assert!(result.allowed);
            assert_eq!(result.limit, u32::MAX);
        }
    }

    #[tokio::test]
    async fn test_export_limit_per_ip() {
        let (service, _) = service(RateLimitConfig::default());
        for _ in 0..10 {
            assert!(service.check(ProtectedAction::Export, "1.2.3.4", None).await.allowed);
        }
        let blocked = service.check(ProtectedAction::Export, "1.2.3.4", None).await;
        assert!(!blocked.allowed);
        assert_eq!(blocked.retry_after, Some(60));

        assert!(service.check(ProtectedAction::Export, "5.6.7.8", None).await.allowed);
        assert!(service.check(ProtectedAction::Generate, "1.2.3.4", None).await.allowed);
    }

    #[tokio::test]
    async fn test_recipient_scope() {
        let (service, _) = service(RateLimitConfig::default());
        for _ in 0..3 {
            let result = service
                .check(ProtectedAction::EmailRecipient, "1.2.3.4", Some("a@example.org"))
                .await;
            assert!(result.allowed);
        }
        assert!(
            !service
                .check(ProtectedAction::EmailRecipient, "1.2.3.4", Some("A@Example.org"))
                .await
                .allowed
        );
        assert!(
            service
                .check(ProtectedAction::EmailRecipient, "1.2.3.4", Some("b@example.org"))
                .await
                .allowed
        );
    }

    #[tokio::test]
    async fn test_window_recovers() {
        let (service, clock) = service(RateLimitConfig::default());
        for _ in 0..11 {
            service.check(ProtectedAction::Export, "1.2.3.4", None).await;
        }
        clock.advance(60_001);
        assert!(service.check(ProtectedAction::Export, "1.2.3.4", None).await.allowed);
    }
}
