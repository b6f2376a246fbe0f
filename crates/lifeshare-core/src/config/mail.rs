//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Outbound messaging provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Provider: `"log"` (write to the tracing log) or `"http"` (JSON relay).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Sender address placed on every message.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// HTTP relay settings, used when `provider = "http"`.
    #[serde(default)]
    pub http: HttpRelayConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from_address: default_from(),
            http: HttpRelayConfig::default(),
        }
    }
}

/// JSON-over-HTTP mail relay settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRelayConfig {
    /// Relay endpoint receiving `POST` requests.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer token sent to the relay.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds (0 uses the client default).
    #[serde(default)]
    pub timeout_seconds: u64,
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from() -> String {
    "no-reply@lifeshare.local".to_string()
}
