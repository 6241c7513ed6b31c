//! Payment provider implementations

pub mod stripe;

pub use stripe::StripePaymentProvider;
