use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use ai_webhook_service::AiWebhookError;
use audit_evidence::EvidenceError;
use audit_report::ReportError;
use audit_store::StoreError;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Http { status, .. } => *status,
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), "request failed: {self}");
        }
        ApiResponse::<()>::failure(self.error_code(), self.to_string()).reply(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Validation(msg) => AppError::Http {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                code: "VALIDATION_ERROR",
                message: msg,
            },
            StoreError::Io(_) | StoreError::Serde(_) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "STORE_ERROR",
                message: err.to_string(),
            },
        }
    }
}

/// Webhook failures are upstream failures: 502, or 504 on timeout.
impl From<AiWebhookError> for AppError {
    fn from(err: AiWebhookError) -> Self {
        let (status, code) = match &err {
            AiWebhookError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "WEBHOOK_TIMEOUT"),
            AiWebhookError::HttpStatus { .. } => (StatusCode::BAD_GATEWAY, "WEBHOOK_HTTP_ERROR"),
            AiWebhookError::HttpTransport(_) => (StatusCode::BAD_GATEWAY, "WEBHOOK_UNREACHABLE"),
            AiWebhookError::Decode(_) => (StatusCode::BAD_GATEWAY, "WEBHOOK_DECODE_ERROR"),
            AiWebhookError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            _ => (StatusCode::BAD_GATEWAY, "WEBHOOK_ERROR"),
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<EvidenceError> for AppError {
    fn from(err: EvidenceError) -> Self {
        match err {
            EvidenceError::Webhook(e) => e.into(),
            EvidenceError::Store(e) => e.into(),
            EvidenceError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Geometry(msg) => AppError::BadRequest(msg),
            ReportError::Pdf(_) | ReportError::Io(_) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "REPORT_RENDER_FAILED",
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_errors_map_to_http_statuses() {
        let nf: AppError = StoreError::NotFound {
            entity: "question",
            id: "q9".into(),
        }
        .into();
        assert_eq!(nf.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(nf.to_string(), "question not found: q9");

        let invalid: AppError = StoreError::Validation("empty id".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(invalid.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn webhook_timeout_is_a_gateway_timeout() {
        let err: AppError = EvidenceError::Webhook(AiWebhookError::Timeout(Duration::from_secs(5))).into();
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.error_code(), "WEBHOOK_TIMEOUT");
    }

    #[test]
    fn response_carries_status() {
        let res = AppError::BadRequest("no ids".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
