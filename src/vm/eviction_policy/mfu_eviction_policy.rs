use std::cmp::Reverse;

use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

/// Evicts the most frequently used page; among equally frequent pages the
/// one loaded first.
pub struct MFUEvictionPolicy {
    warm_up: WarmUp,
}

impl MFUEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        MFUEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
        }
    }
}

impl EvictionPolicy for MFUEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        if let Some(pfn) = self.warm_up.next_free() {
            return pfn;
        }
        frames
            .iter()
            .min_by_key(|(_, page)| (Reverse(page.frequency), page.insertion_order))
            .map_or(0, |(pfn, _)| pfn)
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
