//! # lifeshare-mail
//!
//! Outbound messaging for LifeShare. Providers implement the core
//! [`Mailer`](lifeshare_core::traits::Mailer) trait:
//!
//! - `log`: renders the message and writes it to the tracing log.
//! - `http`: posts the rendered message as JSON to a mail relay.
//!
//! [`MailerManager`] picks the provider from `mail.provider`.

pub mod manager;
pub mod providers;
pub mod templates;

pub use manager::MailerManager;
pub use templates::{
    BloodRequestPayload, DonationReminderPayload, ExpiryReminderPayload, RenderedMail,
};
