//! Capability checks for protected actions and credit settlement afterwards

use tracing::{debug, info};

use super::codec::EntitlementCodec;
use super::grant::IssuedGrant;
use crate::domain::entitlement::{Capability, EntitlementState, Entitlements};

/// Result of checking a caller against one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    pub entitlements: Entitlements,
    /// The verified state, if the caller presented a valid token
    pub state: Option<EntitlementState>,
}

/// Authorizes paid actions from a presented token.
///
/// The gate never persists anything: after a paid action completes the caller
/// asks [`EntitlementGate::settle`] for a replacement token and stores it.
#[derive(Debug, Clone)]
pub struct EntitlementGate {
    codec: EntitlementCodec,
    paywall_enforced: bool,
}

impl EntitlementGate {
    pub fn new(codec: EntitlementCodec, paywall_enforced: bool) -> Self {
        Self {
            codec,
            paywall_enforced,
        }
    }

    pub fn paywall_enforced(&self) -> bool {
        self.paywall_enforced
    }

    /// Verified state for a raw token, if any
    pub fn verify(&self, token: Option<&str>) -> Option<EntitlementState> {
        token.and_then(|t| self.codec.verify(t))
    }

    /// Capabilities for a raw token; absent or invalid tokens are unpaid
    pub fn entitlements(&self, token: Option<&str>) -> Entitlements {
        Entitlements::evaluate(self.verify(token).as_ref(), self.paywall_enforced)
    }

    pub fn ensure_entitled(&self, token: Option<&str>, capability: Capability) -> GateDecision {
        let state = self.verify(token);
        let entitlements = Entitlements::evaluate(state.as_ref(), self.paywall_enforced);
        let allowed = entitlements.has(capability);
        if !allowed {
            debug!(capability = %capability, has_state = state.is_some(), "Capability denied");
        }
        GateDecision {
            allowed,
            entitlements,
            state,
        }
    }

    /// Replacement token after a paid action completed.
    ///
    /// Only metered states (not a subscriber, at least one credit) change; for
    /// everything else the caller keeps its current token and `None` is returned.
    pub fn settle(&self, state: &EntitlementState) -> Option<IssuedGrant> {
        if !state.is_metered() {
            return None;
        }
        let next = state.consume_credit();
        info!(
            remaining = next.remaining_one_time_credits,
            "Consumed one-time credit"
        );
        Some(IssuedGrant {
            token: self.codec.sign(&next),
            state: next,
        })
    }
}
