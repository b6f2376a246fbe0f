//! Outbound messaging trait for pluggable delivery backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Template category of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTemplate {
    /// "Come donate again" nudge to an eligible donor.
    DonationReminder,
    /// A new request needs the donor's blood group.
    BloodRequest,
    /// An inventory row is about to expire.
    ExpiryReminder,
}

impl MailTemplate {
    /// Return the template name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationReminder => "donation_reminder",
            Self::BloodRequest => "blood_request",
            Self::ExpiryReminder => "expiry_reminder",
        }
    }
}

impl std::fmt::Display for MailTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message handed to the outbound messaging collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address.
    pub to: String,
    /// Recipient display name used in the greeting.
    pub recipient_name: String,
    /// Template category.
    pub template: MailTemplate,
    /// Structured template payload.
    pub payload: serde_json::Value,
}

impl MailMessage {
    /// Build a message for `to` using `template`.
    pub fn new(
        to: impl Into<String>,
        recipient_name: impl Into<String>,
        template: MailTemplate,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            to: to.into(),
            recipient_name: recipient_name.into(),
            template,
            payload,
        }
    }
}

/// Acknowledgement returned by a provider that accepted a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Provider-assigned message identifier.
    pub message_id: String,
}

/// Trait for outbound messaging backends (log sink, HTTP relay).
///
/// A returned `Ok` means the provider accepted the message; there is no
/// delivery-confirmation callback.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Attempt delivery of a single message.
    async fn send(&self, message: &MailMessage) -> AppResult<DeliveryReceipt>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
