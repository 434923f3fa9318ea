/*
 * eviction_policy.rs
 *
 * This file defines the trait for eviction policy, which is implemented by
 * the page replacement algorithms, and the warm-up cursor they share.
 */

use crate::vm::{physical_memory::ResidentFrames, types::Pfn};

pub trait EvictionPolicy {
    /// Returns the frame the faulting page is loaded into.
    /// Until every frame has been filled once this is the next never-used
    /// frame in index order. After that it is the frame of the victim page.
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn;

    /// True while there are frames that have never been filled.
    fn is_warming_up(&self) -> bool;
}

/// Hands out the never-used frames `0..capacity` in order.
#[derive(Debug, Clone)]
pub struct WarmUp {
    next_to_allocate: usize,
    capacity: usize,
}

impl WarmUp {
    pub fn new(capacity: usize) -> Self {
        WarmUp {
            next_to_allocate: 0,
            capacity,
        }
    }

    #[inline]
    pub fn next_free(&mut self) -> Option<Pfn> {
        if self.next_to_allocate < self.capacity {
            let pfn = self.next_to_allocate;
            self.next_to_allocate += 1;
            Some(pfn)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.next_to_allocate >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_up_hands_out_each_frame_once() {
        let mut warm_up = WarmUp::new(3);
        assert!(!warm_up.is_done());
        assert_eq!(warm_up.next_free(), Some(0));
        assert_eq!(warm_up.next_free(), Some(1));
        assert_eq!(warm_up.next_free(), Some(2));
        assert!(warm_up.is_done());
        assert_eq!(warm_up.next_free(), None);
        assert_eq!(warm_up.next_free(), None);
    }
}
