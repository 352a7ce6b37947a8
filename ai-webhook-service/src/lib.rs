//! Client for the external evidence-extraction AI webhook.
//!
//! - [`config`]: [`WebhookConfig`] and its env loader.
//! - [`services::webhook_service`]: the `GET` call returning a [`RawAiResponse`].
//! - [`health_service`]: best-effort reachability probe.
//! - [`telemetry`]: library-scoped `tracing` layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod response;
pub mod services;
pub mod telemetry;

pub use config::webhook_config::WebhookConfig;
pub use error_handler::{AiWebhookError, ConfigError};
pub use health_service::{HealthService, HealthStatus};
pub use response::RawAiResponse;
pub use services::webhook_service::WebhookService;
