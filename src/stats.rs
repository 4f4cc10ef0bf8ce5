use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// Per-instance request counters, reset only by restart
#[derive(Default)]
pub struct Counters {
    total: AtomicU64,
    success: AtomicU64,
    failure: AtomicU64,
}

// What /stats reports
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful: u64,
    pub failed: u64,
    pub success_rate: String,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let success = self.success.load(Ordering::Relaxed);
        let failed = self.failure.load(Ordering::Relaxed);
        let rate = success as f64 / total.max(1) as f64 * 100.0;
        StatsSnapshot {
            total_requests: total,
            successful: success,
            failed,
            success_rate: format!("{:.1}%", rate),
        }
    }
}
