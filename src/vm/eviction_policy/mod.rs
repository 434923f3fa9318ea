pub mod eviction_policy;

mod clock_eviction_policy;
mod fifo_eviction_policy;
mod lfu_eviction_policy;
mod lru_eviction_policy;
mod mfu_eviction_policy;
mod random_eviction_policy;
mod second_chance_eviction_policy;

use std::str::FromStr;

pub use clock_eviction_policy::ClockEvictionPolicy;
pub use eviction_policy::EvictionPolicy;
pub use fifo_eviction_policy::FIFOEvictionPolicy;
pub use lfu_eviction_policy::LFUEvictionPolicy;
pub use lru_eviction_policy::LRUEvictionPolicy;
pub use mfu_eviction_policy::MFUEvictionPolicy;
pub use random_eviction_policy::{RandomEvictionPolicy, DEFAULT_SEED};
pub use second_chance_eviction_policy::SecondChanceEvictionPolicy;

use super::{
    physical_memory::ResidentFrames,
    types::{Pfn, VmStatus},
};

/// The replacement algorithms selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Random,
    Lfu,
    Lru,
    Fifo,
    Mfu,
    Clock,
    SecondChance,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Random,
        PolicyKind::Lfu,
        PolicyKind::Lru,
        PolicyKind::Fifo,
        PolicyKind::Mfu,
        PolicyKind::Clock,
        PolicyKind::SecondChance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Lfu => "lfu",
            PolicyKind::Lru => "lru",
            PolicyKind::Fifo => "fifo",
            PolicyKind::Mfu => "mfu",
            PolicyKind::Clock => "clock",
            PolicyKind::SecondChance => "second",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = VmStatus;

    /// Names match exactly; `LRU` is not `lru`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VmStatus::UnknownPolicy(s.to_string()))
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One replacement policy instance, picked at run time.
pub enum ReplacementPolicy {
    Random(RandomEvictionPolicy),
    Lfu(LFUEvictionPolicy),
    Lru(LRUEvictionPolicy),
    Fifo(FIFOEvictionPolicy),
    Mfu(MFUEvictionPolicy),
    Clock(ClockEvictionPolicy),
    SecondChance(SecondChanceEvictionPolicy),
}

impl ReplacementPolicy {
    /// `seed` is only used by the random policy.
    pub fn new(kind: PolicyKind, num_frames: usize, seed: u64) -> Self {
        match kind {
            PolicyKind::Random => {
                ReplacementPolicy::Random(RandomEvictionPolicy::new(num_frames, seed))
            }
            PolicyKind::Lfu => ReplacementPolicy::Lfu(LFUEvictionPolicy::new(num_frames)),
            PolicyKind::Lru => ReplacementPolicy::Lru(LRUEvictionPolicy::new(num_frames)),
            PolicyKind::Fifo => ReplacementPolicy::Fifo(FIFOEvictionPolicy::new(num_frames)),
            PolicyKind::Mfu => ReplacementPolicy::Mfu(MFUEvictionPolicy::new(num_frames)),
            PolicyKind::Clock => ReplacementPolicy::Clock(ClockEvictionPolicy::new(num_frames)),
            PolicyKind::SecondChance => {
                ReplacementPolicy::SecondChance(SecondChanceEvictionPolicy::new(num_frames))
            }
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            ReplacementPolicy::Random(_) => PolicyKind::Random,
            ReplacementPolicy::Lfu(_) => PolicyKind::Lfu,
            ReplacementPolicy::Lru(_) => PolicyKind::Lru,
            ReplacementPolicy::Fifo(_) => PolicyKind::Fifo,
            ReplacementPolicy::Mfu(_) => PolicyKind::Mfu,
            ReplacementPolicy::Clock(_) => PolicyKind::Clock,
            ReplacementPolicy::SecondChance(_) => PolicyKind::SecondChance,
        }
    }

    fn as_dyn(&mut self) -> &mut dyn EvictionPolicy {
        match self {
            ReplacementPolicy::Random(p) => p,
            ReplacementPolicy::Lfu(p) => p,
            ReplacementPolicy::Lru(p) => p,
            ReplacementPolicy::Fifo(p) => p,
            ReplacementPolicy::Mfu(p) => p,
            ReplacementPolicy::Clock(p) => p,
            ReplacementPolicy::SecondChance(p) => p,
        }
    }

    fn as_dyn_ref(&self) -> &dyn EvictionPolicy {
        match self {
            ReplacementPolicy::Random(p) => p,
            ReplacementPolicy::Lfu(p) => p,
            ReplacementPolicy::Lru(p) => p,
            ReplacementPolicy::Fifo(p) => p,
            ReplacementPolicy::Mfu(p) => p,
            ReplacementPolicy::Clock(p) => p,
            ReplacementPolicy::SecondChance(p) => p,
        }
    }
}

impl EvictionPolicy for ReplacementPolicy {
    fn choose_victim(&mut self, frames: &mut ResidentFrames<'_>) -> Pfn {
        self.as_dyn().choose_victim(frames)
    }

    fn is_warming_up(&self) -> bool {
        self.as_dyn_ref().is_warming_up()
    }
}

/// Physical memory with frames `0..n` holding the pages of VFNs `0..n`,
/// each stamped with `insertion_order` equal to its frame.
#[cfg(test)]
pub(crate) fn filled_memory(
    n: usize,
) -> (
    super::physical_memory::PhysicalMemory,
    super::page_table::PageTable,
    Vec<super::types::PageId>,
) {
    use super::{
        page_table::PageTable, physical_memory::PhysicalMemory, stats::VmStats, types::RefKind,
    };

    let mut physmem = PhysicalMemory::new(n);
    let mut page_table = PageTable::new(16, 1024).unwrap();
    let mut stats = VmStats::new();
    let ids: Vec<_> = (0..n)
        .map(|vfn| page_table.lookup(vfn as u32, RefKind::Load, &mut stats).unwrap())
        .collect();
    for (pfn, &id) in ids.iter().enumerate() {
        physmem.load(pfn, id, &mut page_table);
        page_table[id].insertion_order = pfn as u64;
    }
    (physmem, page_table, ids)
}
