use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::state::AppState;

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = state.orchestrator.stats();
    axum::Json(serde_json::json!({
        "total_requests": snap.total_requests,
        "successful": snap.successful,
        "failed": snap.failed,
        "success_rate": snap.success_rate,
        "source": state.source,
    }))
}
