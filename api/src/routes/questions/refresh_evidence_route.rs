//! POST /questions/{id}/evidence/refresh: asks the webhook again and stores the result.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use audit_evidence::{RefreshOutcome, refresh_question_evidence};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, ok},
    },
    error_handler::AppResult,
};

#[instrument(name = "refresh_evidence_route", skip(state))]
pub async fn refresh_evidence(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<RefreshOutcome>>> {
    let webhook = state.webhook()?;
    let outcome = refresh_question_evidence(webhook, &state.store, &id).await?;
    Ok(ok(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AppError;
    use crate::routes::test_support::seeded_state;

    #[tokio::test]
    async fn unavailable_without_webhook() {
        let state = seeded_state().await;
        let err = refresh_evidence(State(state), Path("q1".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }
}
