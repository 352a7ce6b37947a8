//! GET /health: store backend and webhook reachability.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use ai_webhook_service::HealthStatus;

use crate::core::{
    app_state::AppState,
    http::response_envelope::{ApiResponse, ok},
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the webhook probe failed.
    pub status: &'static str,
    pub store: &'static str,
    /// Absent when no webhook is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<HealthStatus>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let webhook = match &state.webhook {
        Some(w) => Some(state.health.check(w.config()).await),
        None => None,
    };
    let status = if webhook.as_ref().is_none_or(|h| h.ok) {
        "ok"
    } else {
        "degraded"
    };

    ok(HealthResponse {
        status,
        store: state.store.kind(),
        webhook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::seeded_state;

    #[tokio::test]
    async fn reports_store_without_webhook() {
        let Json(res) = health(State(seeded_state().await)).await;
        let data = res.data.unwrap();
        assert_eq!(data.status, "ok");
        assert_eq!(data.store, "memory");
        assert!(data.webhook.is_none());
    }
}
