use dashmap::DashMap;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::Clock;

// Last-grant timestamps, keyed by uid. Implementations must be safe
// for concurrent callers.
pub trait GrantStore: Send + Sync {
    fn last_grant(&self, uid: &str) -> Option<u64>;
    fn record_grant(&self, uid: &str, at: u64);
}

// Volatile store. Limits reset on restart, which main logs loudly.
#[derive(Default)]
pub struct MemoryGrantStore {
    grants: DashMap<String, u64>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrantStore for MemoryGrantStore {
    fn last_grant(&self, uid: &str) -> Option<u64> {
        self.grants.get(uid).map(|e| *e)
    }

    fn record_grant(&self, uid: &str, at: u64) {
        self.grants.insert(uid.to_string(), at);
    }
}

// Durable store: a JSON map on disk, rewritten on every grant via
// write-to-temp + rename so readers never see a half-written file.
pub struct FileGrantStore {
    path: PathBuf,
    grants: Mutex<HashMap<String, u64>>,
}

impl FileGrantStore {
    // Missing or corrupt files start the store empty
    pub fn load(path: PathBuf) -> Self {
        let grants = fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Self {
            path,
            grants: Mutex::new(grants),
        }
    }

    fn persist(&self, grants: &HashMap<String, u64>) -> std::io::Result<()> {
        let tmp = self.path.with_extension("tmp");
        let data = serde_json::to_vec(grants).map_err(std::io::Error::other)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)
    }
}

impl GrantStore for FileGrantStore {
    fn last_grant(&self, uid: &str) -> Option<u64> {
        self.grants.lock().unwrap().get(uid).copied()
    }

    fn record_grant(&self, uid: &str, at: u64) {
        let mut grants = self.grants.lock().unwrap();
        grants.insert(uid.to_string(), at);
        if let Err(e) = self.persist(&grants) {
            // keep the in-memory record either way, a crash just re-allows one grant
            tracing::warn!("failed to persist grant file {:?}: {}", self.path, e);
        }
    }
}

// Enforces the per-uid window. try_reserve takes a per-uid lock that is
// held until the guard commits or drops, so two concurrent requests for
// the same uid cannot both pass the check and both commit.
pub struct DailyLimiter {
    store: Arc<dyn GrantStore>,
    window: Duration,
    clock: Arc<dyn Clock>,
    inflight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

// Held between a passed check and its commit. Dropping without commit
// releases the lock and leaves the allowance untouched.
pub struct ReserveGuard<'a> {
    limiter: &'a DailyLimiter,
    uid: String,
    _permit: tokio::sync::OwnedMutexGuard<()>,
}

impl ReserveGuard<'_> {
    pub fn commit(self) {
        let now = self.limiter.clock.now_unix();
        self.limiter.store.record_grant(&self.uid, now);
    }
}

impl DailyLimiter {
    pub fn new(store: Arc<dyn GrantStore>, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            window,
            clock,
            inflight: DashMap::new(),
        }
    }

    // Err carries the time remaining until the uid is eligible again
    pub async fn try_reserve(&self, uid: &str) -> Result<ReserveGuard<'_>, Duration> {
        let lock = self
            .inflight
            .entry(uid.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();
        let permit = lock.lock_owned().await;

        if let Some(last) = self.store.last_grant(uid) {
            let elapsed = self.clock.now_unix().saturating_sub(last);
            let window = self.window.as_secs();
            if elapsed < window {
                return Err(Duration::from_secs(window - elapsed));
            }
        }

        Ok(ReserveGuard {
            limiter: self,
            uid: uid.to_string(),
            _permit: permit,
        })
    }
}
