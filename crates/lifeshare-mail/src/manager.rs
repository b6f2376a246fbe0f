//! Mailer manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use lifeshare_core::config::mail::MailConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{DeliveryReceipt, MailMessage, Mailer};

use crate::providers::{HttpMailer, LogMailer};

/// Wraps the mail provider selected at construction time.
#[derive(Debug, Clone)]
pub struct MailerManager {
    inner: Arc<dyn Mailer>,
}

impl MailerManager {
    /// Create a mailer from configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let inner: Arc<dyn Mailer> = match config.provider.as_str() {
            "log" => {
                info!("Initializing log mail provider");
                Arc::new(LogMailer::new(config.from_address.clone()))
            }
            "http" => {
                info!(endpoint = %config.http.endpoint, "Initializing HTTP mail provider");
                Arc::new(HttpMailer::new(config)?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown mail provider: '{other}'. Supported: log, http"
                )));
            }
        };
        Ok(Self { inner })
    }

    /// Create a manager around an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn Mailer>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl Mailer for MailerManager {
    async fn send(&self, message: &MailMessage) -> AppResult<DeliveryReceipt> {
        self.inner.send(message).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
