//! Issues fresh entitlement tokens after a confirmed payment

use tracing::info;

use super::codec::{EntitlementCodec, EntitlementToken};
use crate::domain::entitlement::{EntitlementState, GrantMode};

/// A newly minted token together with the state it encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedGrant {
    pub token: EntitlementToken,
    pub state: EntitlementState,
}

/// Mints entitlement tokens.
///
/// Only call [`GrantIssuer::grant`] once the payment provider has confirmed the
/// payment; the issuer does not check anything itself.
#[derive(Debug, Clone)]
pub struct GrantIssuer {
    codec: EntitlementCodec,
}

impl GrantIssuer {
    pub fn new(codec: EntitlementCodec) -> Self {
        Self { codec }
    }

    pub fn grant(&self, mode: GrantMode) -> IssuedGrant {
        let state = EntitlementState::granted(mode, self.codec.clock().now_millis());
        let token = self.codec.sign(&state);
        info!(
            mode = %mode,
            expires_at = state.expires_at,
            credits = state.remaining_one_time_credits,
            "Issued entitlement grant"
        );
        IssuedGrant { token, state }
    }
}
