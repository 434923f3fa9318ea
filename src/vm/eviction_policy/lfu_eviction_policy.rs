use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

// Very simple LFU eviction policy.
// `frequency` counts accesses since the page was last loaded. If there are
// multiple pages with the same minimum frequency, the one loaded first goes.
pub struct LFUEvictionPolicy {
    warm_up: WarmUp,
}

impl LFUEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        LFUEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
        }
    }
}

impl EvictionPolicy for LFUEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        if let Some(pfn) = self.warm_up.next_free() {
            return pfn;
        }
        frames
            .iter()
            .min_by_key(|(_, page)| (page.frequency, page.insertion_order))
            .map_or(0, |(pfn, _)| pfn)
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
