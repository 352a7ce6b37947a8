//! GET /questions/{id}/citations

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use audit_store::Citation;

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiResponse, ok},
    },
    error_handler::AppResult,
};

/// 404 for an unknown question; `[]` for a question without citations.
pub async fn list_citations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Citation>>>> {
    state.store.get_question(&id).await?;
    let rows = state.store.select_citations(&id).await?;
    Ok(ok(rows))
}
