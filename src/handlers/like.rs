use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::LikeError;
use crate::metrics::{RATE_LIMITED, REQUEST_TOTAL};
use crate::models::LikeResponse;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LikeParams {
    uid: Option<String>,
    server: Option<String>,
}

pub async fn like_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LikeParams>,
) -> Response {
    REQUEST_TOTAL.inc();

    // both params must be present and non-empty before the core runs
    let (uid, server) = match (params.uid, params.server) {
        (Some(uid), Some(server)) if !uid.is_empty() && !server.is_empty() => (uid, server),
        _ => return super::error_response(&LikeError::MissingParameter, &state.source),
    };

    match state.orchestrator.process(&uid, &server).await {
        Ok(grant) => Json(LikeResponse::from_grant(
            grant,
            &state.source,
            &state.telegram_id,
        ))
        .into_response(),
        Err(err) => {
            if matches!(err, LikeError::RateLimited { .. }) {
                RATE_LIMITED.inc();
            }
            super::error_response(&err, &state.source)
        }
    }
}
