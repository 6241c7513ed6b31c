//! Sliding Window Rate Limiter
//!
//! Keeps the timestamps of recent attempts per key. An attempt is recorded before
//! admission is decided, so rejected attempts keep counting against the caller.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::types::{RateLimitResult, retry_after_secs};
use crate::infrastructure::clock::Clock;

/// In-process sliding window limiter
pub struct SlidingWindowLimiter {
    buckets: Mutex<HashMap<String, VecDeque<i64>>>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Record an attempt under `key` and decide whether it is admitted.
    ///
    /// `limit` and `window_ms` are expected to be positive; a zero limit blocks
    /// everything and a non-positive window keeps only the current attempt.
    pub async fn check(&self, key: &str, limit: u32, window_ms: i64) -> RateLimitResult {
        let now = self.clock.now_millis();
        let window_start = now.saturating_sub(window_ms);
        let cap = usize::try_from(limit).unwrap_or(usize::MAX).saturating_add(1);

        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(key.to_string()).or_default();

        while bucket.front().is_some_and(|&t| t <= window_start) {
            bucket.pop_front();
        }
        bucket.push_back(now);
        // Past limit + 1 entries the outcome is "blocked" regardless
        while bucket.len() > cap {
            bucket.pop_front();
        }

        let count = u32::try_from(bucket.len()).unwrap_or(u32::MAX);
        let reset_at = bucket
            .front()
            .copied()
            .unwrap_or(now)
            .saturating_add(window_ms);

        if count <= limit {
            RateLimitResult::allowed(limit, limit - count, reset_at)
        } else {
            RateLimitResult::blocked(limit, reset_at, retry_after_secs(reset_at, now))
        }
    }

    /// Drop buckets with no attempts inside `max_window_ms`
    pub async fn cleanup(&self, max_window_ms: i64) -> usize {
        let window_start = self.clock.now_millis().saturating_sub(max_window_ms);
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| bucket.back().is_some_and(|&t| t > window_start));
        before - buckets.len()
    }

    /// Number of live buckets
    pub async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Periodically sweep idle buckets until `shutdown` is cancelled
    pub fn spawn_cleanup(
        self: Arc<Self>,
        every: Duration,
        max_window_ms: i64,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(every);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Rate limiter cleanup task stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = self.cleanup(max_window_ms).await;
                        debug!(removed, "Rate limiter cleanup completed");
                    }
                }
            }
        })
    }
}
