use std::{env, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_rejection::json_error_mapper,
    routes::{
        health_route::health,
        normalize_route::normalize_answer,
        questions::{
            citations_route::list_citations, list_questions_route::list_questions,
            refresh_evidence_route::refresh_evidence, save_edits_route::save_edits,
            upsert_question_route::upsert_question,
        },
        reports::export_report_route::export_report_route,
    },
};

const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// Builds state from env, binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.into());
    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("api listening on {host_url}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api stopped");
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/normalize", post(normalize_answer))
        .route("/auditees/{auditee_id}/questions", get(list_questions))
        .route("/questions/save", post(save_edits))
        .route("/questions/{id}", put(upsert_question))
        .route("/questions/{id}/evidence/refresh", post(refresh_evidence))
        .route("/questions/{id}/citations", get(list_citations))
        .route("/reports", post(export_report_route))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!("failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
