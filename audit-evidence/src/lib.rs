//! Evidence extraction for audit questionnaires.
//!
//! 1) **Normalizer** ([`normalizer`]) is a pure transform of one raw webhook
//!    answer into answer / evidence / source strings plus citation records,
//!    with a strict JSON stage and a regex salvage stage.
//! 2) **Refresh** ([`refresh`]) is the caller side: load the question, ask the
//!    webhook, normalize, replace the question's citations, update its fields.
//!    Also applies batches of per-row edits.
//!
//! Uses `tracing` for step logging and plain `async fn` over the enum-dispatched
//! [`audit_store::StoreClient`].

pub mod errors;
pub mod normalizer;
pub mod refresh;

pub use ai_webhook_service::RawAiResponse;
pub use audit_store::{Citation, NO_VALUE};
pub use errors::{EvidenceError, EvidenceResult, MalformedUpstream};
pub use normalizer::{
    NormalizedAnswer, decode_file_name, format_evidence, format_sources, normalize,
};
pub use refresh::{
    RefreshOutcome, SaveFailure, SaveReport, apply_edits, apply_webhook_answer, build_prompt,
    refresh_question_evidence,
};
