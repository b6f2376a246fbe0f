//! Provider that posts rendered messages to a JSON mail relay.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use lifeshare_core::config::mail::MailConfig;
use lifeshare_core::error::{AppError, ErrorKind};
use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{DeliveryReceipt, MailMessage, Mailer, MailTemplate};

use crate::templates::render;

/// Body posted to the relay.
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    template: MailTemplate,
}

/// Relay acknowledgement. The id is optional.
#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Mail relay client.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// Build a relay client from configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        if config.http.endpoint.is_empty() {
            return Err(AppError::configuration(
                "mail.http.endpoint is required when mail.provider = \"http\"",
            ));
        }
        let mut builder = reqwest::Client::builder();
        if config.http.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.http.timeout_seconds));
        }
        let client = builder.build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build mail relay client", e)
        })?;
        Ok(Self {
            client,
            endpoint: config.http.endpoint.clone(),
            api_key: config.http.api_key.clone(),
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> AppResult<DeliveryReceipt> {
        let rendered = render(message)?;
        let body = RelayRequest {
            from: &self.from,
            to: &message.to,
            subject: &rendered.subject,
            text: &rendered.text,
            template: message.template,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Mail relay request failed", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external(format!(
                "Mail relay rejected message to {}: HTTP {status}",
                message.to
            )));
        }

        let ack: RelayResponse = response.json().await.unwrap_or(RelayResponse { id: None });
        let message_id = ack.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!(message_id = %message_id, to = %message.to, "Mail accepted by relay");
        Ok(DeliveryReceipt { message_id })
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
