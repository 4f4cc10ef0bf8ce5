mod index;
mod like;
mod metrics;
mod stats;

pub use index::{index_handler, not_found_handler};
pub use like::like_handler;
pub use metrics::metrics_handler;
pub use stats::stats_handler;

use axum::Json;
use axum::response::{IntoResponse, Response};

use crate::error::LikeError;
use crate::models::ErrorBody;

// Every failure leaves the service as the same JSON shape
pub fn error_response(err: &LikeError, source: &str) -> Response {
    (err.status(), Json(ErrorBody::from_error(err, source))).into_response()
}
