use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::error::LikeError;
use crate::state::AppState;

// Service descriptor served at /
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Like API is running",
        "endpoints": {
            "/like": "GET with /like?uid={uid}&server={server}",
            "/stats": "GET - API statistics",
            "/metrics": "GET - prometheus metrics"
        },
        "source": state.source,
        "status": "active"
    }))
}

// Router fallback for unknown paths
pub async fn not_found_handler(State(state): State<Arc<AppState>>) -> Response {
    super::error_response(&LikeError::EndpointNotFound, &state.source)
}
