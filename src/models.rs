use serde::Serialize;

use crate::error::LikeError;
use crate::orchestrator::LikeGrant;

// Success envelope. Field names (including the inverted before/after
// labels) are the legacy wire format and must not change.
#[derive(Serialize, Debug)]
pub struct LikeResponse {
    #[serde(rename = "LikesGivenByAPI")]
    pub likes_given: u32,
    #[serde(rename = "LikesbeforeCommand")]
    pub likes_before: u64,
    #[serde(rename = "LikesafterCommand")]
    pub likes_after: u64,
    #[serde(rename = "PlayerNickname")]
    pub nickname: String,
    #[serde(rename = "UID")]
    pub uid: String,
    pub server: String,
    pub source: String,
    pub telegram_id: String,
    pub devolved_by: String,
}

impl LikeResponse {
    pub fn from_grant(grant: LikeGrant, source: &str, telegram_id: &str) -> Self {
        Self {
            likes_given: grant.likes_given,
            likes_before: grant.likes_before,
            likes_after: grant.likes_after,
            nickname: grant.nickname,
            uid: grant.uid,
            server: grant.server,
            source: source.to_string(),
            telegram_id: telegram_id.to_string(),
            devolved_by: source.to_string(),
        }
    }
}

// Error envelope: {status: 0, error, source, code}, plus retry_after
// seconds when the daily limit rejected the call
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub status: u8,
    pub error: String,
    pub source: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorBody {
    pub fn from_error(err: &LikeError, source: &str) -> Self {
        Self {
            status: 0,
            error: err.to_string(),
            source: source.to_string(),
            code: err.status().as_u16(),
            retry_after: err.retry_after_secs(),
        }
    }
}
