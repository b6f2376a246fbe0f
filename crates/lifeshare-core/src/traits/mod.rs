//! Core traits defined in `lifeshare-core` and implemented by other crates.

pub mod mailer;

pub use mailer::{DeliveryReceipt, MailMessage, MailTemplate, Mailer};
