//! PUT /questions/{id}: creates or replaces a question.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use audit_store::Question;

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, ok},
    },
    error_handler::{AppError, AppResult},
    routes::questions::question_request::UpsertQuestionRequest,
};

pub async fn upsert_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpsertQuestionRequest>,
) -> AppResult<Json<ApiResponse<Question>>> {
    let text = body
        .fields
        .question
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("`question` must not be empty".into()))?;

    let mut question = Question::new(id.trim(), body.auditee_id.trim(), text);
    body.fields.apply(&mut question);
    question.question = text.to_string();

    let saved = state.store.upsert_question(question).await?;
    info!("question {} saved for auditee {}", saved.id, saved.auditee_id);
    Ok(ok(saved))
}
