//! API controllers

pub mod analytics;
pub mod billing;
pub mod communities;
pub mod email;
pub mod entitlements;
pub mod export;
pub mod health;
pub mod letters;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, header},
    response::Response,
};

use hoa_core::application::{PaidActionGuard, StartCheckoutUseCase, VerifyPaymentUseCase};
use hoa_core::domain::billing::PaymentProvider;
use hoa_core::domain::community::CommunityStore;
use hoa_core::domain::mail::EmailSender;
use hoa_core::infrastructure::Clock;
use hoa_core::infrastructure::entitlement::{GrantIssuer, IssuedGrant};
use hoa_core::infrastructure::export::ExportRegistry;
use hoa_llm::TextGenerator;

use crate::presentation::extractors::ENTITLEMENT_COOKIE;

/// Shared state for every controller.
///
/// Collaborators left unconfigured at startup are `None`; their endpoints answer 503.
#[derive(Clone)]
pub struct AppState {
    pub guard: PaidActionGuard,
    pub grants: GrantIssuer,
    pub clock: Arc<dyn Clock>,
    pub checkout: Option<Arc<StartCheckoutUseCase>>,
    pub verify_payment: Option<Arc<VerifyPaymentUseCase>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub mailer: Option<Arc<dyn EmailSender>>,
    pub exporters: Arc<ExportRegistry>,
    pub communities: Arc<dyn CommunityStore>,
}

impl AppState {
    pub fn new(
        guard: PaidActionGuard,
        grants: GrantIssuer,
        clock: Arc<dyn Clock>,
        communities: Arc<dyn CommunityStore>,
    ) -> Self {
        Self {
            guard,
            grants,
            clock,
            checkout: None,
            verify_payment: None,
            generator: None,
            mailer: None,
            exporters: Arc::new(ExportRegistry::with_defaults()),
            communities,
        }
    }

    pub fn with_payments(mut self, payments: Arc<dyn PaymentProvider>) -> Self {
        self.checkout = Some(Arc::new(StartCheckoutUseCase::new(payments.clone())));
        self.verify_payment = Some(Arc::new(VerifyPaymentUseCase::new(
            payments,
            self.grants.clone(),
        )));
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn EmailSender>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_exporters(mut self, exporters: ExportRegistry) -> Self {
        self.exporters = Arc::new(exporters);
        self
    }

    /// Store a freshly issued token on the caller via `Set-Cookie`
    pub(crate) fn attach_grant(&self, response: &mut Response, grant: Option<IssuedGrant>) {
        let Some(grant) = grant else {
            return;
        };
        let cookie = entitlement_cookie(&grant, self.clock.now_millis());
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Entitlement cookie is not a valid header value"),
        }
    }
}

/// `Set-Cookie` value for a grant; `Max-Age` is its remaining lifetime
pub fn entitlement_cookie(grant: &IssuedGrant, now_millis: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Secure; Max-Age={}",
        ENTITLEMENT_COOKIE,
        grant.token,
        grant.state.remaining_lifetime_secs(now_millis)
    )
}
