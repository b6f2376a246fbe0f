//! Provider that writes rendered messages to the tracing log.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{DeliveryReceipt, MailMessage, Mailer};

use crate::templates::render;

/// Accepts every well-formed message and logs it. Used in development.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Create a log mailer sending as `from`.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<DeliveryReceipt> {
        let rendered = render(message)?;
        let message_id = Uuid::new_v4().to_string();
        info!(
            message_id = %message_id,
            from = %self.from,
            to = %message.to,
            template = %message.template,
            subject = %rendered.subject,
            "Mail accepted by log provider"
        );
        Ok(DeliveryReceipt { message_id })
    }

    fn provider_name(&self) -> &'static str {
        "log"
    }
}
