use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

/// Evicts the page with the oldest `counter` stamp. The simulator stamps
/// `counter` from its global clock on every access.
pub struct LRUEvictionPolicy {
    warm_up: WarmUp,
}

impl LRUEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        LRUEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
        }
    }
}

impl EvictionPolicy for LRUEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        if let Some(pfn) = self.warm_up.next_free() {
            return pfn;
        }
        frames
            .iter()
            .min_by_key(|(_, page)| page.counter)
            .map_or(0, |(pfn, _)| pfn)
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::eviction_policy::filled_memory;

    #[test]
    fn test_lru_picks_smallest_counter() {
        let (physmem, mut pt, ids) = filled_memory(3);
        let mut policy = LRUEvictionPolicy::new(3);
        for _ in 0..3 {
            policy.choose_victim(&mut physmem.resident(&mut pt));
        }
        pt[ids[0]].counter = 10;
        pt[ids[1]].counter = 4;
        pt[ids[2]].counter = 7;
        assert_eq!(policy.choose_victim(&mut physmem.resident(&mut pt)), 1);
        pt[ids[1]].counter = 11;
        assert_eq!(policy.choose_victim(&mut physmem.resident(&mut pt)), 2);
    }
}
