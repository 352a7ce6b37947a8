//! POST /reports: renders the selected questions as a PDF download.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use audit_report::{ReportOptions, ReportRecord, export_report};
use audit_store::Question;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::reports::report_request::ReportRequest,
};

const FILE_NAME: &str = "audit-report.pdf";

pub async fn export_report_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReportRequest>,
) -> AppResult<Response> {
    let questions = select_questions(&state, &body).await?;
    let records: Vec<ReportRecord> = questions.iter().map(ReportRecord::from).collect();

    let mut options = ReportOptions::new(body.auditee_name.trim());
    if let Some(title) = body.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        options.title = title.to_string();
    }

    let pdf = export_report(&state.store, records, &options).await?;
    info!("report exported: {} question(s), {} bytes", questions.len(), pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}

async fn select_questions(state: &AppState, body: &ReportRequest) -> AppResult<Vec<Question>> {
    let questions = if !body.question_ids.is_empty() {
        let mut out = Vec::with_capacity(body.question_ids.len());
        for id in &body.question_ids {
            out.push(state.store.get_question(id).await?);
        }
        out
    } else if let Some(auditee) = body.auditee_id.as_deref().filter(|a| !a.trim().is_empty()) {
        state.store.list_questions(auditee.trim()).await?
    } else {
        return Err(AppError::BadRequest(
            "provide `question_ids` or `auditee_id`".into(),
        ));
    };

    if questions.is_empty() {
        return Err(AppError::BadRequest("no questions selected for the report".into()));
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::routes::test_support::seeded_state;

    fn request(ids: &[&str], auditee: Option<&str>) -> ReportRequest {
        ReportRequest {
            auditee_name: "Acme Ltd".into(),
            title: None,
            question_ids: ids.iter().map(|s| s.to_string()).collect(),
            auditee_id: auditee.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn renders_pdf_for_selected_ids() {
        let state = seeded_state().await;
        let res = export_report_route(State(state), Json(request(&["q2", "q1"], None)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
    }

    #[tokio::test]
    async fn selects_by_auditee() {
        let state = seeded_state().await;
        let qs = select_questions(&state, &request(&[], Some("acme"))).await.unwrap();
        assert_eq!(qs.len(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_and_empty_selection_is_rejected() {
        let state = seeded_state().await;
        let err = select_questions(&state, &request(&["q1", "zz"], None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = select_questions(&state, &request(&[], None)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = select_questions(&state, &request(&[], Some("globex")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
