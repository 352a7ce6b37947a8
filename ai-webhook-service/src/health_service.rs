//! Reachability probe for the evidence-extraction webhook.
//!
//! The webhook exposes no dedicated health route, so the probe issues a
//! `HEAD` request against the configured endpoint and treats any HTTP answer
//! below 500 as "reachable" (webhook engines reply 404/405 to `HEAD` on
//! GET-only hooks). The returned [`HealthStatus`] is JSON-serializable and
//! suitable for a `/health` endpoint. [`HealthService::check`] never fails.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::webhook_config::WebhookConfig;
use crate::error_handler::AiWebhookError;

/// A serializable health snapshot for the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Probed endpoint (no query string).
    pub endpoint: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(endpoint: &str, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(endpoint: &str, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client with a short timeout.
#[derive(Debug, Clone)]
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiWebhookError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiWebhookError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self { client })
    }

    /// Probes the webhook endpoint. Any failure is reported as `ok = false`.
    pub async fn check(&self, cfg: &WebhookConfig) -> HealthStatus {
        let endpoint = cfg.base_url();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(endpoint = %cfg.endpoint, "invalid webhook endpoint");
            return HealthStatus::fail(endpoint, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        debug!("HEAD {}", endpoint);
        match self.client.head(endpoint).send().await {
            Ok(resp) => {
                let latency = start.elapsed().as_millis();
                let status = resp.status();
                if status.is_server_error() {
                    warn!(%status, latency_ms = latency, "webhook probe got server error");
                    HealthStatus::fail(endpoint, latency, format!("webhook returned {status}"))
                } else {
                    info!(%status, latency_ms = latency, "webhook probe completed");
                    HealthStatus::ok(endpoint, latency, format!("webhook reachable ({status})"))
                }
            }
            Err(e) => {
                let latency = start.elapsed().as_millis();
                warn!(error = %e, latency_ms = latency, "webhook probe failed");
                HealthStatus::fail(endpoint, latency, e.to_string())
            }
        }
    }
}
