use rand::{rngs::StdRng, Rng, SeedableRng};

use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

pub const DEFAULT_SEED: u64 = 1234567;

// Uniformly random victim. Seeded so runs are reproducible.
pub struct RandomEvictionPolicy {
    warm_up: WarmUp,
    rng: StdRng,
}

impl RandomEvictionPolicy {
    pub fn new(num_frames: usize, seed: u64) -> Self {
        RandomEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EvictionPolicy for RandomEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        if let Some(pfn) = self.warm_up.next_free() {
            return pfn;
        }
        self.rng.gen_range(0..frames.len())
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
