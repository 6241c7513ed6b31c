//! Entitlement state and grant modes

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Lifetime of a one-time purchase grant
pub const ONE_TIME_GRANT_TTL_MS: i64 = DAY_MS;

/// Lifetime of a subscription grant
pub const SUBSCRIPTION_GRANT_TTL_MS: i64 = 30 * DAY_MS;

/// Paid access state carried inside an entitlement token.
///
/// `remaining_one_time_credits` is meaningless for subscribers and is kept at 0
/// for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementState {
    /// Granted through a recurring payment
    pub is_subscriber: bool,
    /// Epoch milliseconds after which the state is void
    pub expires_at: i64,
    /// Paid one-time actions still available
    pub remaining_one_time_credits: u32,
}

impl EntitlementState {
    /// Fresh state for a confirmed payment.
    ///
    /// Grants never stack: a new purchase always replaces whatever the caller held.
    pub fn granted(mode: GrantMode, now_millis: i64) -> Self {
        match mode {
            GrantMode::Subscription => Self {
                is_subscriber: true,
                expires_at: now_millis.saturating_add(SUBSCRIPTION_GRANT_TTL_MS),
                remaining_one_time_credits: 0,
            },
            GrantMode::OneTime => Self {
                is_subscriber: false,
                expires_at: now_millis.saturating_add(ONE_TIME_GRANT_TTL_MS),
                remaining_one_time_credits: 1,
            },
        }
    }

    /// Valid strictly before `expires_at`
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at
    }

    /// True when the state itself pays for a gated action
    pub fn grants_paid_access(&self) -> bool {
        self.is_subscriber || self.remaining_one_time_credits > 0
    }

    /// True when completing a paid action should spend a credit
    pub fn is_metered(&self) -> bool {
        !self.is_subscriber && self.remaining_one_time_credits > 0
    }

    /// State after one paid action completed.
    ///
    /// Subscribers are returned unchanged; credits never go below zero.
    pub fn consume_credit(self) -> Self {
        if self.is_subscriber {
            return self;
        }
        Self {
            remaining_one_time_credits: self.remaining_one_time_credits.saturating_sub(1),
            ..self
        }
    }

    /// Remaining lifetime in whole seconds, floored at zero
    pub fn remaining_lifetime_secs(&self, now_millis: i64) -> i64 {
        (self.expires_at.saturating_sub(now_millis) / 1000).max(0)
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum GrantMode {
    #[serde(rename = "subscription")]
    Subscription,
    #[serde(rename = "one-time")]
    OneTime,
}

impl GrantMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantMode::Subscription => "subscription",
            GrantMode::OneTime => "one-time",
        }
    }

    /// Lenient parse used at the HTTP boundary: anything but "subscription" is one-time
    pub fn from_loose(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("subscription") {
            GrantMode::Subscription
        } else {
            GrantMode::OneTime
        }
    }
}

impl std::fmt::Display for GrantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_subscription_grant() {
        let state = EntitlementState::granted(GrantMode::Subscription, NOW);
        assert!(state.is_subscriber);
        assert_eq!(state.remaining_one_time_credits, 0);
        assert_eq!(state.expires_at, NOW + 30 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_one_time_grant() {
        let state = EntitlementState::granted(GrantMode::OneTime, NOW);
        assert!(!state.is_subscriber);
        assert_eq!(state.remaining_one_time_credits, 1);
        assert_eq!(state.expires_at, NOW + 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_validity_is_strict() {
        let state = EntitlementState::granted(GrantMode::OneTime, NOW);
        assert!(state.is_valid_at(state.expires_at - 1));
        assert!(!state.is_valid_at(state.expires_at));
        assert!(!state.is_valid_at(state.expires_at + 1));
    }

    #[test]
    fn test_consume_credit_decrements() {
        let state = EntitlementState::granted(GrantMode::OneTime, NOW);
        let next = state.consume_credit();
        assert_eq!(next.remaining_one_time_credits, 0);
        assert_eq!(next.expires_at, state.expires_at);
        assert!(!next.grants_paid_access());
    }

    #[test]
    fn test_consume_credit_floors_at_zero() {
        let state = EntitlementState {
            is_subscriber: false,
            expires_at: NOW,
            remaining_one_time_credits: 0,
        };
        assert_eq!(state.consume_credit().remaining_one_time_credits, 0);
    }

    #[test]
    fn test_subscriber_is_not_metered() {
        let state = EntitlementState {
            is_subscriber: true,
            expires_at: NOW,
            remaining_one_time_credits: 4,
        };
        assert_eq!(state.consume_credit(), state);
        assert!(!state.is_metered());
    }

    #[test]
    fn test_remaining_lifetime() {
        let state = EntitlementState::granted(GrantMode::OneTime, NOW);
        assert_eq!(state.remaining_lifetime_secs(NOW), 86_400);
        assert_eq!(state.remaining_lifetime_secs(state.expires_at + 5_000), 0);
    }

    #[test]
    fn test_grant_mode_serde() {
        assert_eq!(
            serde_json::to_string(&GrantMode::OneTime).unwrap(),
            "\"one-time\""
        );
        assert_eq!(GrantMode::from_loose(" Subscription "), GrantMode::Subscription);
        assert_eq!(GrantMode::from_loose("lifetime"), GrantMode::OneTime);
    }
}
