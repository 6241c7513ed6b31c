//! Guard for rate-limited, paywalled actions
//!
//! A protected action runs as: throttle -> authorize -> action -> settle.
//! Settlement happens only after the action succeeded.

use std::sync::Arc;

use crate::application::errors::ApplicationError;
use crate::domain::entitlement::{Capability, EntitlementState, Entitlements};
use crate::infrastructure::entitlement::{EntitlementGate, GateDecision, IssuedGrant};
use crate::infrastructure::rate_limiter::{ProtectedAction, RateLimitResult, RateLimiterService};

#[derive(Clone)]
pub struct PaidActionGuard {
    rate_limiter: Arc<RateLimiterService>,
    gate: EntitlementGate,
}

impl PaidActionGuard {
    pub fn new(rate_limiter: Arc<RateLimiterService>, gate: EntitlementGate) -> Self {
        Self { rate_limiter, gate }
    }

    pub fn gate(&self) -> &EntitlementGate {
        &self.gate
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiterService> {
        &self.rate_limiter
    }

    /// Record an attempt; a blocked attempt becomes [`ApplicationError::RateLimited`]
    pub async fn throttle(
        &self,
        action: ProtectedAction,
        ip: &str,
        scope: Option<&str>,
    ) -> Result<RateLimitResult, ApplicationError> {
        let result = self.rate_limiter.check(action, ip, scope).await;
        if result.allowed {
            Ok(result)
        } else {
            Err(ApplicationError::RateLimited { result })
        }
    }

    /// Capabilities for a presented token
    pub fn entitlements(&self, token: Option<&str>) -> Entitlements {
        self.gate.entitlements(token)
    }

    /// Require `capability`; a denial becomes [`ApplicationError::UpgradeRequired`]
    pub fn authorize(
        &self,
        token: Option<&str>,
        capability: Capability,
    ) -> Result<GateDecision, ApplicationError> {
        let decision = self.gate.ensure_entitled(token, capability);
        if decision.allowed {
            Ok(decision)
        } else {
            Err(ApplicationError::UpgradeRequired { capability })
        }
    }

    /// Replacement token once the authorized action has completed
    pub fn settle(&self, state: Option<&EntitlementState>) -> Option<IssuedGrant> {
        state.and_then(|s| self.gate.settle(s))
    }
}
