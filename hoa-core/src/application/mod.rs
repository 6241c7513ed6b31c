//! Application Layer - Use cases shared by every delivery surface

pub mod billing;
pub mod errors;
pub mod paid_action;

pub use billing::{StartCheckoutUseCase, VerifyPaymentResult, VerifyPaymentUseCase};
pub use errors::ApplicationError;
pub use paid_action::PaidActionGuard;
