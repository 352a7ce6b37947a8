//! POST /questions/save: applies the pending per-row edits in one request.

use std::sync::Arc;

use axum::{Json, extract::State};

use audit_evidence::{SaveReport, apply_edits};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, ok},
    },
    error_handler::{AppError, AppResult},
    routes::questions::question_request::SaveEditsRequest,
};

/// Rows that fail are listed in the report; the request itself still succeeds.
pub async fn save_edits(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveEditsRequest>,
) -> AppResult<Json<ApiResponse<SaveReport>>> {
    if body.edits.is_empty() {
        return Err(AppError::BadRequest("`edits` must not be empty".into()));
    }
    let report = apply_edits(&state.store, &body.edits).await;
    Ok(ok(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::seeded_state;

    #[tokio::test]
    async fn applies_edits_and_reports_failures() {
        let state = seeded_state().await;
        let body: SaveEditsRequest = serde_json::from_str(
            r#"{"edits": {
                "q1": {"control_evaluation": "Effective"},
                "q9": {"answer": "No"}
            }}"#,
        )
        .unwrap();

        let Json(res) = save_edits(State(state.clone()), Json(body)).await.unwrap();
        let report = res.data.unwrap();
        assert_eq!(report.updated, vec!["q1"]);
        assert_eq!(report.failed[0].question_id, "q9");

        let q1 = state.store.get_question("q1").await.unwrap();
        assert_eq!(q1.control_evaluation, "Effective");
    }

    #[tokio::test]
    async fn empty_registry_is_a_bad_request() {
        let state = seeded_state().await;
        let body: SaveEditsRequest = serde_json::from_str(r#"{"edits": {}}"#).unwrap();
        assert!(save_edits(State(state), Json(body)).await.is_err());
    }
}
