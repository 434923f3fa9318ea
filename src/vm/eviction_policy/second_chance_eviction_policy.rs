use std::collections::VecDeque;

use super::eviction_policy::{EvictionPolicy, WarmUp};
use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

/// Second chance (FIFO with a reference bit).
///
/// Frames are kept in the order their current pages were loaded. Walking from
/// the oldest, a page with `chance` set has it cleared and is passed over; the
/// first page without it is the victim. If every page had its bit set, the
/// walk has cleared them all and the oldest page goes.
pub struct SecondChanceEvictionPolicy {
    warm_up: WarmUp,
    queue: VecDeque<Pfn>,
}

impl SecondChanceEvictionPolicy {
    pub fn new(num_frames: usize) -> Self {
        SecondChanceEvictionPolicy {
            warm_up: WarmUp::new(num_frames),
            queue: VecDeque::with_capacity(num_frames),
        }
    }

    /// Frames oldest first.
    pub fn queue(&self) -> impl Iterator<Item = Pfn> + '_ {
        self.queue.iter().copied()
    }

    fn sweep(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        debug_assert!(self
            .queue
            .iter()
            .zip(self.queue.iter().skip(1))
            .all(|(&a, &b)| frames.page(a).insertion_order <= frames.page(b).insertion_order));

        let mut victim = None;
        for (pos, &pfn) in self.queue.iter().enumerate() {
            let page = frames.page_mut(pfn);
            if page.chance {
                page.chance = false;
            } else {
                victim = Some(pos);
                break;
            }
        }
        let pos = victim.unwrap_or(0);
        match self.queue.remove(pos) {
            Some(pfn) => pfn,
            None => panic!("second chance queue is empty after warm-up"),
        }
    }
}

impl EvictionPolicy for SecondChanceEvictionPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        let pfn = match self.warm_up.next_free() {
            Some(pfn) => pfn,
            None => self.sweep(frames),
        };
        // The page loaded into `pfn` is now the youngest.
        self.queue.push_back(pfn);
        pfn
    }

    fn is_warming_up(&self) -> bool {
        !self.warm_up.is_done()
    }
}
