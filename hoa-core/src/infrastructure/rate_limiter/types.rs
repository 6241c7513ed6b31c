//! Rate limiter types

use serde::{Deserialize, Serialize};

/// Actions that are rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectedAction {
    Generate,
    Export,
    Email,
    /// Email sending scoped to one recipient
    EmailRecipient,
}

impl ProtectedAction {
    /// Route name used as the key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectedAction::Generate => "generate",
            ProtectedAction::Export => "export",
            ProtectedAction::Email => "email",
            ProtectedAction::EmailRecipient => "email-to",
        }
    }
}

impl std::fmt::Display for ProtectedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key used to identify rate limit buckets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    /// One bucket per action and client address
    Ip {
        action: ProtectedAction,
        ip: String,
    },
    /// Narrower bucket: action, client address and a scope such as a recipient
    Scoped {
        action: ProtectedAction,
        ip: String,
        scope: String,
    },
}

impl RateLimitKey {
    pub fn new(action: ProtectedAction, ip: &str, scope: Option<&str>) -> Self {
        match scope {
            Some(scope) => RateLimitKey::Scoped {
                action,
                ip: ip.to_string(),
                scope: scope.trim().to_lowercase(),
            },
            None => RateLimitKey::Ip {
                action,
                ip: ip.to_string(),
            },
        }
    }

    pub fn action(&self) -> ProtectedAction {
        match self {
            RateLimitKey::Ip { action, .. } | RateLimitKey::Scoped { action, .. } => *action,
        }
    }

    /// Flat bucket key, e.g. `export:203.0.113.9`
    pub fn to_bucket_key(&self) -> String {
        match self {
            RateLimitKey::Ip { action, ip } => format!("{}:{}", action, ip),
            RateLimitKey::Scoped { action, ip, scope } => {
                format!("{}:{}:{}", action, ip, scope)
            }
        }
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Maximum attempts allowed in the window
    pub limit: u32,
    /// Attempts left in the current window
    pub remaining: u32,
    /// Epoch milliseconds when the oldest recorded attempt leaves the window
    pub reset_at: i64,
    /// Recommended wait in seconds (only set when blocked)
    pub retry_after: Option<u64>,
}

impl RateLimitResult {
    /// Create a new allowed result
    pub fn allowed(limit: u32, remaining: u32, reset_at: i64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at,
            retry_after: None,
        }
    }

    /// Create a new blocked result
    pub fn blocked(limit: u32, reset_at: i64, retry_after: u64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at,
            retry_after: Some(retry_after),
        }
    }

    /// Result used when limiting is switched off
    pub fn unlimited() -> Self {
        Self::allowed(u32::MAX, u32::MAX, 0)
    }
}

/// Whole seconds until `reset_at`, never less than one
pub fn retry_after_secs(reset_at: i64, now_millis: i64) -> u64 {
    let wait_ms = reset_at.saturating_sub(now_millis).max(0);
    let secs = (wait_ms + 999) / 1000;
    u64::try_from(secs).unwrap_or(0).max(1)
}
