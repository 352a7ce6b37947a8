//! Unified error handling for `ai-webhook-service`.
//!
//! This module exposes a single top-level error type [`AiWebhookError`] for the
//! whole library, and groups config errors in a nested enum ([`ConfigError`]).
//! Small helpers for reading/validating environment variables are provided and
//! return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI Webhook]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiWebhookError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-webhook-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiWebhookError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI Webhook] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI Webhook] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL (without query string).
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as a webhook answer.
    #[error("[AI Webhook] decode error: {0}")]
    Decode(String),

    /// Operation exceeded the configured timeout.
    #[error("[AI Webhook] operation timed out after {0:?}")]
    Timeout(Duration),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI Webhook] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (timeouts).
    #[error("[AI Webhook] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `AI_WEBHOOK_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., non-https URL).
    #[error("[AI Webhook] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `AI_WEBHOOK_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with https://`).
        reason: &'static str,
    },

    /// Query parameter names must not be empty.
    #[error("[AI Webhook] query parameter name must not be empty: {0}")]
    EmptyParam(&'static str),
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`AiWebhookError::Config`] with [`ConfigError::MissingVar`] if the
/// variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but is not a
/// valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u64>().map(Some).map_err(|_| {
            AiWebhookError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Reads a boolean flag from env; only `true`/`1` (case-insensitive) are truthy.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that the webhook endpoint uses `https://`.
///
/// With `allow_http` the plain `http://` scheme is accepted as well (local
/// development only).
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the scheme is not accepted.
pub fn validate_https_endpoint(var: &'static str, value: &str, allow_http: bool) -> Result<()> {
    if value.starts_with("https://") || (allow_http && value.starts_with("http://")) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: if allow_http {
                "must start with http:// or https://"
            } else {
                "must start with https://"
            },
        }
        .into())
    }
}

/// Takes at most 240 chars of a response body for error messages.
pub fn make_snippet(text: &str) -> String {
    text.trim().chars().take(240).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_is_required_by_default() {
        assert!(validate_https_endpoint("AI_WEBHOOK_URL", "https://hooks.example.com/x", false).is_ok());
        let err = validate_https_endpoint("AI_WEBHOOK_URL", "http://hooks.example.com/x", false)
            .unwrap_err();
        assert!(err.to_string().contains("must start with https://"));
    }

    #[test]
    fn http_accepted_when_allowed() {
        assert!(validate_https_endpoint("AI_WEBHOOK_URL", "http://localhost:5678", true).is_ok());
        assert!(validate_https_endpoint("AI_WEBHOOK_URL", "ftp://localhost", true).is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        assert_eq!(make_snippet(&long).len(), 240);
        assert_eq!(make_snippet("  short \n"), "short");
    }
}
