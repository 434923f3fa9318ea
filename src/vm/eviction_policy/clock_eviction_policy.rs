use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

/// Clock algorithm. The hand sweeps the frames circularly, clearing `used`
/// bits, and stops at the first page whose bit is already clear. The hand
/// then rests one past the victim.
pub struct ClockEvictionPolicy {
    warm_up: WarmUp,
    hand: Pfn,
}

impl ClockEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        ClockEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
            hand: 0,
        }
    }

    pub fn hand(&self) -> Pfn {
        self.hand
    }

    // Terminates within one full turn: every bit passed over is cleared.
    fn sweep(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        let num_frames = frames.len();
        loop {
            let pfn = self.hand;
            self.hand = (self.hand + 1) % num_frames;
            let page = frames.page_mut(pfn);
            if page.used {
                page.used = false;
            } else {
                return pfn;
            }
        }
    }
}

impl EvictionPolicy for ClockEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        match self.warm_up.next_free() {
            Some(pfn) => pfn,
            None => self.sweep(frames),
        }
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
