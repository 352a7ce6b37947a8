use ai_webhook_service::{
    AiWebhookError, ConfigError, HealthService, WebhookService, config::env_config::config_from_env,
};
use audit_store::{StoreClient, StoreConfig};
use tracing::{info, warn};

use crate::error_handler::AppError;

/// Timeout of the `/health` webhook probe.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Shared state for all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: StoreClient,
    /// `None` when `AI_WEBHOOK_URL` is unset; evidence refresh then answers 503.
    pub webhook: Option<WebhookService>,
    pub health: HealthService,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let store_cfg = StoreConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        let store = StoreClient::from_config(store_cfg);

        let webhook = match config_from_env() {
            Ok(cfg) => Some(WebhookService::new(cfg).map_err(config_error)?),
            Err(AiWebhookError::Config(ConfigError::MissingVar(var))) => {
                warn!("{var} is not set; evidence refresh is disabled");
                None
            }
            Err(e) => return Err(config_error(e)),
        };

        let health = HealthService::new(Some(HEALTH_TIMEOUT_SECS)).map_err(config_error)?;

        info!(
            "app state ready: store={} webhook={}",
            store.kind(),
            webhook
                .as_ref()
                .map_or("disabled", |w| w.config().base_url())
        );
        Ok(Self {
            store,
            webhook,
            health,
        })
    }

    pub fn new(store: StoreClient, webhook: Option<WebhookService>, health: HealthService) -> Self {
        Self {
            store,
            webhook,
            health,
        }
    }

    pub fn webhook(&self) -> Result<&WebhookService, AppError> {
        self.webhook
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("AI webhook is not configured".into()))
    }
}

fn config_error(e: AiWebhookError) -> AppError {
    AppError::Config(e.to_string())
}
