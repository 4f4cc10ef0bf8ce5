// Clock abstraction so the limiter can be driven by a fake clock in tests

pub trait Clock: Send + Sync {
    // Wall-clock time as unix seconds
    fn now_unix(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

// Manually advanced clock for tests
#[cfg(test)]
pub struct ManualClock {
    secs: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(secs: u64) -> Self {
        Self {
            secs: std::sync::atomic::AtomicU64::new(secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.secs.load(std::sync::atomic::Ordering::SeqCst)
    }
}
