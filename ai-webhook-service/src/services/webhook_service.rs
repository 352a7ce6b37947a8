//! Thin client for the evidence-extraction webhook.
//!
//! One call is exposed:
//! - `GET {endpoint}?{prompt_param}=<prompt>&{id_param}=<caller id>` → [`RawAiResponse`]
//!
//! No authentication header is sent and no retry is attempted; the request
//! timeout is the HTTP client's.
//!
//! # Examples
//!
//! ```no_run
//! use ai_webhook_service::config::webhook_config::WebhookConfig;
//! use ai_webhook_service::services::webhook_service::WebhookService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = WebhookConfig {
//!     endpoint: "https://hooks.example.com/webhook/evidence".into(),
//!     timeout_secs: Some(120),
//!     prompt_param: "message".into(),
//!     id_param: "session_id".into(),
//!     allow_http: false,
//! };
//!
//! let svc = WebhookService::new(cfg)?;
//! let raw = svc.ask("Are backups performed nightly?", "q-17").await?;
//! println!("result = {:?}", raw.result);
//! # Ok(()) }
//! ```

use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::webhook_config::WebhookConfig;
use crate::error_handler::{
    AiWebhookError, ConfigError, Result, make_snippet, validate_https_endpoint,
};
use crate::response::RawAiResponse;

/// Thin client for the webhook.
///
/// Reuses one HTTP client built with the configured timeout.
#[derive(Debug, Clone)]
pub struct WebhookService {
    client: reqwest::Client,
    cfg: WebhookConfig,
    url: String,
    timeout: Duration,
}

impl WebhookService {
    /// Creates a new [`WebhookService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not `https://`
    ///   (or `http://` with `cfg.allow_http`)
    /// - [`ConfigError::EmptyParam`] if a query parameter name is empty
    /// - [`AiWebhookError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: WebhookConfig) -> Result<Self> {
        let url = cfg.base_url().to_string();
        validate_https_endpoint("AI_WEBHOOK_URL", &url, cfg.allow_http)?;
        if cfg.prompt_param.trim().is_empty() {
            return Err(ConfigError::EmptyParam("AI_WEBHOOK_PROMPT_PARAM").into());
        }
        if cfg.id_param.trim().is_empty() {
            return Err(ConfigError::EmptyParam("AI_WEBHOOK_ID_PARAM").into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent("audit-desk/0.1")
            .build()?;

        Ok(Self {
            client,
            cfg,
            url,
            timeout,
        })
    }

    /// Config this client was built from.
    pub fn config(&self) -> &WebhookConfig {
        &self.cfg
    }

    /// Asks the webhook about one question.
    ///
    /// # Errors
    /// - [`AiWebhookError::Timeout`] when the client timeout elapses
    /// - [`AiWebhookError::HttpStatus`] for non-2xx responses
    /// - [`AiWebhookError::HttpTransport`] for other client errors
    /// - [`AiWebhookError::Decode`] if the body is not a webhook answer
    #[instrument(skip_all, fields(caller_id = %caller_id))]
    pub async fn ask(&self, prompt: &str, caller_id: &str) -> Result<RawAiResponse> {
        debug!("GET {} (prompt_len={})", self.url, prompt.len());
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                (self.cfg.prompt_param.as_str(), prompt),
                (self.cfg.id_param.as_str(), caller_id),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AiWebhookError::HttpStatus {
                status,
                url: self.url.clone(),
                snippet: make_snippet(&text),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        let raw = RawAiResponse::from_body(&body)?;
        debug!(
            "webhook answered result={:?} output_len={}",
            raw.result,
            raw.output.as_ref().map(|s| s.len()).unwrap_or(0)
        );
        Ok(raw)
    }

    fn map_transport(&self, e: reqwest::Error) -> AiWebhookError {
        if e.is_timeout() {
            AiWebhookError::Timeout(self.timeout)
        } else {
            AiWebhookError::HttpTransport(e)
        }
    }
}
