//! Webhook config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `AI_WEBHOOK_URL`          = webhook endpoint (mandatory, `https://`)
//! - `AI_WEBHOOK_TIMEOUT_SECS` = optional request timeout (u64, default 120)
//! - `AI_WEBHOOK_PROMPT_PARAM` = prompt query parameter (default `message`)
//! - `AI_WEBHOOK_ID_PARAM`     = caller-id query parameter (default `session_id`)
//! - `AI_WEBHOOK_ALLOW_HTTP`   = `true` to accept `http://` (local development)

use crate::{
    config::webhook_config::WebhookConfig,
    error_handler::{
        AiWebhookError, ConfigError, env_flag, env_opt_u64, must_env, validate_https_endpoint,
    },
};

/// Default request timeout when `AI_WEBHOOK_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Constructs the webhook config from environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if `AI_WEBHOOK_URL` is missing
/// - [`ConfigError::InvalidFormat`] if the URL is not `https://`
/// - [`ConfigError::InvalidNumber`] if the timeout is not a number
pub fn config_from_env() -> Result<WebhookConfig, AiWebhookError> {
    let endpoint = must_env("AI_WEBHOOK_URL")?;
    let allow_http = env_flag("AI_WEBHOOK_ALLOW_HTTP");
    validate_https_endpoint("AI_WEBHOOK_URL", &endpoint, allow_http)?;

    let timeout_secs = env_opt_u64("AI_WEBHOOK_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    let prompt_param = param_or("AI_WEBHOOK_PROMPT_PARAM", "message")?;
    let id_param = param_or("AI_WEBHOOK_ID_PARAM", "session_id")?;

    Ok(WebhookConfig {
        endpoint,
        timeout_secs,
        prompt_param,
        id_param,
        allow_http,
    })
}

fn param_or(var: &'static str, default: &str) -> Result<String, AiWebhookError> {
    match std::env::var(var) {
        Ok(v) if v.trim().is_empty() => Err(ConfigError::EmptyParam(var).into()),
        Ok(v) => Ok(v.trim().to_string()),
        Err(_) => Ok(default.to_string()),
    }
}
