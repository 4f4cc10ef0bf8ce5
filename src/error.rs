use axum::http::StatusCode;
use thiserror::Error;

use crate::upstream::UpstreamError;

// Everything process() can fail with, plus the router's 404. All
// terminal, all reported as JSON with a stable code; the messages are
// part of the wire format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LikeError {
    #[error("Invalid UID format")]
    InvalidUid,
    #[error("Missing uid or server parameter")]
    MissingParameter,
    #[error("Daily like limit reached for this UID")]
    RateLimited { retry_after_secs: u64 },
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Service timeout")]
    ServiceTimeout,
    #[error("Service unavailable")]
    ServiceUnavailable,
    #[error("Unknown error")]
    UnknownUpstream,
    #[error("Endpoint not found")]
    EndpointNotFound,
}

impl LikeError {
    pub fn status(&self) -> StatusCode {
        match self {
            LikeError::InvalidUid | LikeError::MissingParameter => StatusCode::BAD_REQUEST,
            LikeError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            LikeError::PlayerNotFound | LikeError::EndpointNotFound => StatusCode::NOT_FOUND,
            LikeError::ServiceTimeout
            | LikeError::ServiceUnavailable
            | LikeError::UnknownUpstream => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            LikeError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl From<UpstreamError> for LikeError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout => LikeError::ServiceTimeout,
            UpstreamError::NotFound => LikeError::PlayerNotFound,
            UpstreamError::Http => LikeError::ServiceUnavailable,
            UpstreamError::Unknown => LikeError::UnknownUpstream,
        }
    }
}
