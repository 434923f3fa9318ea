use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

/// Evicts the page that was loaded first, however often it was used since.
pub struct FIFOEvictionPolicy {
    warm_up: WarmUp,
}

impl FIFOEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        FIFOEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
        }
    }
}

impl EvictionPolicy for FIFOEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        if let Some(pfn) = self.warm_up.next_free() {
            return pfn;
        }
        frames
            .iter()
            .min_by_key(|(_, page)| page.insertion_order)
            .map_or(0, |(pfn, _)| pfn)
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
