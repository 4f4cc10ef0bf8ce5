use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

// Picks the like increment for a successful request, uniformly from a
// fixed set of plausible values. The RNG is injected so tests can seed it.
pub struct LikeSynthesizer {
    values: Vec<u32>,
    rng: Mutex<StdRng>,
}

impl LikeSynthesizer {
    pub fn new(values: &[u32]) -> Self {
        Self::with_rng(values, StdRng::from_os_rng())
    }

    pub fn seeded(values: &[u32], seed: u64) -> Self {
        Self::with_rng(values, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(values: &[u32], rng: StdRng) -> Self {
        assert!(!values.is_empty(), "like value set must be non-empty");
        Self {
            values: values.to_vec(),
            rng: Mutex::new(rng),
        }
    }

    pub fn choose(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap();
        let i = rng.random_range(0..self.values.len());
        self.values[i]
    }
}
