//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use lifeshare_auth::JwtDecoder;
use lifeshare_core::config::AppConfig;
use lifeshare_database::Repositories;
use lifeshare_service::Services;
use lifeshare_worker::JobExecutor;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Cloning is cheap:
/// every field is an `Arc` or a bundle of them.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Store bundle, kept for health checks.
    pub repos: Repositories,
    /// Business services.
    pub services: Services,
    /// Identity token verifier.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Runs manual sweep triggers.
    pub executor: Arc<JobExecutor>,
}

impl AppState {
    /// Wire the state from its parts.
    pub fn new(
        config: AppConfig,
        repos: Repositories,
        services: Services,
        executor: Arc<JobExecutor>,
    ) -> Self {
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        Self {
            config: Arc::new(config),
            repos,
            services,
            jwt_decoder,
            executor,
        }
    }
}
