//! GET /auditees/{auditee_id}/questions

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use audit_store::Question;

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, ok},
    },
    error_handler::AppResult,
};

pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Path(auditee_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Question>>>> {
    let questions = state.store.list_questions(&auditee_id).await?;
    debug!("auditee {auditee_id}: {} question(s)", questions.len());
    Ok(ok(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::seeded_state;

    #[tokio::test]
    async fn lists_only_the_auditee_questions() {
        let state = seeded_state().await;
        let Json(res) = list_questions(State(state.clone()), Path("acme".into()))
            .await
            .unwrap();
        let ids: Vec<String> = res.data.unwrap().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["q1", "q2"]);

        let Json(res) = list_questions(State(state), Path("globex".into()))
            .await
            .unwrap();
        assert!(res.data.unwrap().is_empty());
    }
}
