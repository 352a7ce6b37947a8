pub mod citations_route;
pub mod list_questions_route;
pub mod question_request;
pub mod refresh_evidence_route;
pub mod save_edits_route;
pub mod upsert_question_route;
