use std::sync::Arc;

use crate::error::LikeError;
use crate::limiter::DailyLimiter;
use crate::stats::{Counters, StatsSnapshot};
use crate::synth::LikeSynthesizer;
use crate::upstream::ProfileLookup;

// One successful /like call. before/after keep the legacy wire
// labeling, which is inverted: after is the upstream count, before is
// that count minus the synthesized increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeGrant {
    pub uid: String,
    pub server: String,
    pub nickname: String,
    pub likes_given: u32,
    pub likes_before: u64,
    pub likes_after: u64,
}

// Core state machine: validate -> reserve -> fetch -> synthesize ->
// commit, with counters owned by the instance.
pub struct Orchestrator {
    upstream: Arc<dyn ProfileLookup>,
    synth: LikeSynthesizer,
    limiter: DailyLimiter,
    counters: Counters,
}

// uid must be 1-20 ascii digits
pub fn validate_uid(uid: &str) -> bool {
    !uid.is_empty() && uid.len() <= 20 && uid.bytes().all(|b| b.is_ascii_digit())
}

impl Orchestrator {
    pub fn new(
        upstream: Arc<dyn ProfileLookup>,
        synth: LikeSynthesizer,
        limiter: DailyLimiter,
    ) -> Self {
        Self {
            upstream,
            synth,
            limiter,
            counters: Counters::new(),
        }
    }

    pub async fn process(&self, uid: &str, server: &str) -> Result<LikeGrant, LikeError> {
        self.counters.record_request();
        let result = self.run(uid, server).await;
        match &result {
            Ok(_) => self.counters.record_success(),
            Err(_) => self.counters.record_failure(),
        }
        result
    }

    async fn run(&self, uid: &str, server: &str) -> Result<LikeGrant, LikeError> {
        if server.is_empty() {
            return Err(LikeError::MissingParameter);
        }
        if !validate_uid(uid) {
            return Err(LikeError::InvalidUid);
        }

        let reservation = self
            .limiter
            .try_reserve(uid)
            .await
            .map_err(|retry| LikeError::RateLimited {
                retry_after_secs: retry.as_secs(),
            })?;

        // a fetch failure drops the reservation, so the allowance is kept
        let snapshot = self.upstream.fetch(uid).await?;

        let likes_given = self.synth.choose();
        let likes_before = snapshot.likes.saturating_sub(likes_given as u64);

        reservation.commit();

        Ok(LikeGrant {
            uid: uid.to_string(),
            server: server.to_string(),
            nickname: snapshot.nickname,
            likes_given,
            likes_before,
            likes_after: snapshot.likes,
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.counters.snapshot()
    }
}
