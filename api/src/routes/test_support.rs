use std::sync::Arc;

use ai_webhook_service::HealthService;
use audit_store::{MemoryStore, Question, StoreClient};

use crate::core::app_state::AppState;

/// Memory-backed state without a webhook, seeded with two "acme" questions.
pub(crate) async fn seeded_state() -> Arc<AppState> {
    let store = StoreClient::Memory(MemoryStore::new());
    for (id, text) in [("q1", "Are backups run nightly?"), ("q2", "Is MFA enforced?")] {
        store
            .upsert_question(Question::new(id, "acme", text))
            .await
            .unwrap();
    }
    let health = HealthService::new(Some(1)).unwrap();
    Arc::new(AppState::new(store, None, health))
}
