//! Email sender implementations

pub mod sendgrid;

pub use sendgrid::SendGridEmailSender;
