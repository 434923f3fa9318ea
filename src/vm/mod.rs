pub mod eviction_policy;
pub mod page_table;
pub mod physical_memory;
pub mod simulator;
pub mod stats;
pub mod types;

pub mod prelude {
    pub use super::eviction_policy::{EvictionPolicy, PolicyKind, ReplacementPolicy, DEFAULT_SEED};
    pub use super::page_table::{PageEntry, PageTable};
    pub use super::physical_memory::{PhysicalMemory, MIN_PHYS_PAGES};
    pub use super::simulator::{AccessOutcome, Simulator};
    pub use super::stats::VmStats;
    pub use super::types::{PageId, Pfn, Pid, RefKind, TraceRecord, Vfn, VmStatus};
}
