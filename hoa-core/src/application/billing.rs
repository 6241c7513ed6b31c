//! Checkout and payment confirmation use cases

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::errors::ApplicationError;
use crate::domain::billing::{CheckoutSession, PaymentProvider};
use crate::domain::entitlement::GrantMode;
use crate::infrastructure::entitlement::{GrantIssuer, IssuedGrant};

/// Use case for starting a hosted checkout
pub struct StartCheckoutUseCase {
    payments: Arc<dyn PaymentProvider>,
}

impl StartCheckoutUseCase {
    pub fn new(payments: Arc<dyn PaymentProvider>) -> Self {
        Self { payments }
    }

    /// Redirect URL for the provider's checkout page
    #[instrument(skip(self), fields(mode = %mode))]
    pub async fn execute(&self, mode: GrantMode) -> Result<String, ApplicationError> {
        let url = self.payments.create_checkout_session(mode).await?;
        info!("Checkout session created");
        Ok(url)
    }
}

/// Result of confirming a checkout session
#[derive(Debug, Clone)]
pub struct VerifyPaymentResult {
    pub session: CheckoutSession,
    /// Present only when the session was paid
    pub grant: Option<IssuedGrant>,
}

/// Use case for confirming a payment and issuing the matching grant
pub struct VerifyPaymentUseCase {
    payments: Arc<dyn PaymentProvider>,
    grants: GrantIssuer,
}

impl VerifyPaymentUseCase {
    pub fn new(payments: Arc<dyn PaymentProvider>, grants: GrantIssuer) -> Self {
        Self { payments, grants }
    }

    /// Look the session up at the provider; grant only on confirmed payment
    #[instrument(skip(self))]
    pub async fn execute(&self, session_id: &str) -> Result<VerifyPaymentResult, ApplicationError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ApplicationError::invalid_input("Missing session_id"));
        }

        let session = self.payments.retrieve_session(session_id).await?;
        if !session.paid {
            warn!(session_id, "Checkout session is not paid");
            return Ok(VerifyPaymentResult {
                session,
                grant: None,
            });
        }

        let mode = session.mode.unwrap_or(GrantMode::OneTime);
        let grant = self.grants.grant(mode);
        Ok(VerifyPaymentResult {
            session,
            grant: Some(grant),
        })
    }
}
