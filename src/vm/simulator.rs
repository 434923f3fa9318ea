use log::info;

use super::{
    eviction_policy::{EvictionPolicy, PolicyKind, ReplacementPolicy},
    page_table::PageTable,
    physical_memory::PhysicalMemory,
    stats::VmStats,
    types::{PageId, Pfn, RefKind, TraceRecord, Vfn, VmStatus},
};
use crate::{config::SimConfig, log_debug, log_trace};

/// References between two progress messages.
pub const PROGRESS_INTERVAL: u64 = 6400;

/// What a single reference did to physical memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit { pfn: Pfn },
    Fault { pfn: Pfn, evicted: Option<Vfn> },
}

impl AccessOutcome {
    pub fn pfn(&self) -> Pfn {
        match *self {
            AccessOutcome::Hit { pfn } | AccessOutcome::Fault { pfn, .. } => pfn,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, AccessOutcome::Fault { .. })
    }
}

/// Owns the whole simulated machine for one run.
pub struct Simulator {
    page_table: PageTable,
    physmem: PhysicalMemory,
    policy: ReplacementPolicy,
    stats: VmStats,
    clock: u64,         // Stamps `counter` on every access
    insertion_seq: u64, // Stamps `insertion_order` on every load
    limit: u64,
    num_refs: u64,
}

impl Simulator {
    pub fn new(config: &SimConfig) -> Result<Self, VmStatus> {
        config.validate()?;
        let page_table = PageTable::new(config.address_bits, config.page_size)?;
        let physmem = PhysicalMemory::new(config.num_frames);
        let policy = ReplacementPolicy::new(config.policy, config.num_frames, config.seed);
        info!(
            "Simulator created: algorithm: {}, frames: {}, vfn_bits: {}, levels: {:?}",
            config.policy,
            config.num_frames,
            page_table.vfn_bits(),
            page_table.levels()
        );
        Ok(Simulator {
            page_table,
            physmem,
            policy,
            stats: VmStats::new(),
            clock: 0,
            insertion_seq: 0,
            limit: config.limit,
            num_refs: 0,
        })
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn stats(&self) -> &VmStats {
        &self.stats
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn physical_memory(&self) -> &PhysicalMemory {
        &self.physmem
    }

    /// References processed so far.
    pub fn num_refs(&self) -> u64 {
        self.num_refs
    }

    pub fn limit_reached(&self) -> bool {
        self.limit != 0 && self.num_refs >= self.limit
    }

    /// Process one trace record.
    pub fn access(&mut self, record: &TraceRecord) -> Result<AccessOutcome, VmStatus> {
        let kind = record.kind;
        let vfn = self.page_table.vaddr_to_vfn(record.vaddr);
        self.num_refs += 1;
        self.stats.inc_reference(kind);

        let id = self.page_table.lookup(vfn, kind, &mut self.stats)?;
        let outcome = match self.page_table[id].pfn() {
            Some(pfn) => AccessOutcome::Hit { pfn },
            None => {
                self.stats.inc_fault(kind);
                let outcome = self.handle_page_fault(id, kind);
                self.page_table[id].insertion_order = self.insertion_seq;
                self.insertion_seq += 1;
                outcome
            }
        };

        let clock = self.clock;
        self.clock += 1;
        let page = &mut self.page_table[id];
        assert!(page.is_valid(), "page {} not resident after access", id);
        page.frequency += 1;
        page.used = true;
        page.chance = true;
        page.reference = true;
        page.counter = clock;
        if kind == RefKind::Store {
            page.modified = true;
        }
        log_trace!("Access {}: {:?}", record, outcome);
        Ok(outcome)
    }

    // Invariant: page `id` is not resident
    fn handle_page_fault(&mut self, id: PageId, kind: RefKind) -> AccessOutcome {
        let pfn = self
            .policy
            .choose_victim(&mut self.physmem.resident(&mut self.page_table));
        let evicted = self
            .physmem
            .evict(pfn, kind, &mut self.page_table, &mut self.stats)
            .map(|old| self.page_table[old].vfn());
        if let Some(old_vfn) = evicted {
            log_debug!("Page evicted: pfn: {} vfn: 0x{:x}", pfn, old_vfn);
        }
        self.physmem.load(pfn, id, &mut self.page_table);
        log_debug!("Page loaded: pfn: {} vfn: 0x{:x}", pfn, self.page_table[id].vfn());
        AccessOutcome::Fault { pfn, evicted }
    }

    /// Feed records until the input ends or the reference limit is reached.
    /// Returns the number of references processed by this call.
    pub fn run<I>(&mut self, records: I) -> Result<u64, VmStatus>
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        let start = self.num_refs;
        let mut records = records.into_iter();
        // Check the limit before pulling so no record is read past it.
        while !self.limit_reached() {
            let Some(record) = records.next() else {
                break;
            };
            self.access(&record)?;
            if self.num_refs % PROGRESS_INTERVAL == 0 {
                info!("{} references processed", self.num_refs);
            }
        }
        if self.limit_reached() {
            info!("Reached {} references", self.num_refs);
        }
        Ok(self.num_refs - start)
    }

    /// Write the page table and frame contents at debug level.
    pub fn dump(&self) {
        log_debug!("Stats:\n{}", self.stats);
        self.page_table.dump();
        self.physmem.dump(&self.page_table);
    }

    #[cfg(test)]
    pub fn run_checks(&self) {
        self.physmem.run_checks(&self.page_table);
        // Once warm, memory stays full
        if !self.policy.is_warming_up() {
            assert_eq!(self.physmem.num_occupied(), self.physmem.capacity());
        }
    }

    #[cfg(test)]
    pub fn touch(&mut self, vfn: Vfn, kind: RefKind) -> AccessOutcome {
        let vaddr = vfn << self.page_table.page_bits();
        self.access(&TraceRecord::new(0, kind, vaddr)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{random::RandomTrace, utils::init_test_logger};

    fn simulator(policy: PolicyKind, num_frames: usize) -> Simulator {
        let config = SimConfig::new(policy, num_frames, 1024).unwrap();
        Simulator::new(&config).unwrap()
    }

    fn resident_vfns(sim: &Simulator) -> Vec<Vfn> {
        let mut vfns: Vec<Vfn> = sim
            .physical_memory()
            .iter()
            .filter_map(|(_, id)| id.map(|id| sim.page_table()[id].vfn()))
            .collect();
        vfns.sort_unstable();
        vfns
    }

    #[test]
    fn test_fifo_scenario() {
        init_test_logger();
        let mut sim = simulator(PolicyKind::Fifo, 3);
        for vfn in [1, 2, 3] {
            assert!(sim.touch(vfn, RefKind::Load).is_fault());
        }
        assert_eq!(sim.touch(1, RefKind::Load), AccessOutcome::Hit { pfn: 0 });
        assert_eq!(
            sim.touch(4, RefKind::Load),
            AccessOutcome::Fault {
                pfn: 0,
                evicted: Some(1)
            }
        );
        assert_eq!(sim.stats().total_references(), 5);
        assert_eq!(sim.stats().total_faults(), 4);
        assert_eq!(sim.stats().total_compulsory(), 4);
        assert_eq!(sim.stats().total_evictions(), 1);
        assert_eq!(resident_vfns(&sim), vec![2, 3, 4]);
        sim.run_checks();
    }

    #[test]
    fn test_lru_evicts_least_recent() {
        let mut sim = simulator(PolicyKind::Lru, 3);
        sim.touch(1, RefKind::Code);
        sim.touch(2, RefKind::Code);
        sim.touch(3, RefKind::Code);
        sim.touch(1, RefKind::Code);
        // 2 is now the least recently used
        assert_eq!(
            sim.touch(4, RefKind::Code),
            AccessOutcome::Fault {
                pfn: 1,
                evicted: Some(2)
            }
        );
        assert_eq!(resident_vfns(&sim), vec![1, 3, 4]);
        sim.run_checks();
    }

    #[test]
    fn test_lru_never_reaccessed_page_goes_first() {
        let mut sim = simulator(PolicyKind::Lru, 4);
        sim.touch(9, RefKind::Load);
        for vfn in 10..13 {
            sim.touch(vfn, RefKind::Load);
            sim.touch(vfn, RefKind::Load);
        }
        match sim.touch(20, RefKind::Load) {
            AccessOutcome::Fault { evicted, .. } => assert_eq!(evicted, Some(9)),
            hit => panic!("expected a fault, got {:?}", hit),
        }
    }

    #[test]
    fn test_dirty_eviction_counted_once() {
        let mut sim = simulator(PolicyKind::Fifo, 3);
        sim.touch(1, RefKind::Load);
        sim.touch(1, RefKind::Store);
        sim.touch(1, RefKind::Store);
        sim.touch(2, RefKind::Load);
        sim.touch(3, RefKind::Load);
        // Evicts dirty 1 on behalf of a code fetch
        sim.touch(4, RefKind::Code);
        assert_eq!(sim.stats().dirty_evictions(RefKind::Code), 1);
        assert_eq!(sim.stats().total_dirty_evictions(), 1);
        // Evicts clean 2
        sim.touch(5, RefKind::Code);
        assert_eq!(sim.stats().evictions(RefKind::Code), 2);
        assert_eq!(sim.stats().total_dirty_evictions(), 1);
        // Page 1 comes back clean
        sim.touch(1, RefKind::Load);
        let page = sim.page_table().get(1).unwrap();
        assert!(page.is_valid());
        assert!(!page.modified);
        assert_eq!(page.frequency, 1);
    }

    #[test]
    fn test_warm_up_and_steady_state_all_policies() {
        init_test_logger();
        let trace = RandomTrace::new(3000, 24, 1024, 42);
        let num_frames = 8;
        for kind in PolicyKind::ALL {
            let mut sim = simulator(kind, num_frames);
            for record in trace.iter() {
                let warming_up = sim.policy.is_warming_up();
                let evictions_before = sim.stats().total_evictions();
                let outcome = sim.access(record).unwrap();
                let evictions = sim.stats().total_evictions() - evictions_before;
                match outcome {
                    AccessOutcome::Hit { .. } => assert_eq!(evictions, 0),
                    AccessOutcome::Fault { evicted, .. } if warming_up => {
                        assert_eq!(evicted, None, "{} evicted during warm-up", kind);
                        assert_eq!(evictions, 0);
                    }
                    AccessOutcome::Fault { evicted, .. } => {
                        assert!(evicted.is_some(), "{} steady state without eviction", kind);
                        assert_eq!(evictions, 1);
                    }
                }
                sim.run_checks();
            }
            let stats = sim.stats();
            assert_eq!(stats.total_references(), 3000);
            assert_eq!(stats.total_evictions(), stats.total_faults() - num_frames as u64);
            assert_eq!(stats.total_compulsory(), sim.page_table().num_pages() as u64);
            assert!(stats.total_dirty_evictions() <= stats.total_evictions());
        }
    }

    #[test]
    fn test_clock_and_second_chance_match_fifo_without_reaccess() {
        // Every reference touches a new page, so no used/chance bit is
        // ever set again after a load.
        let vfns: Vec<Vfn> = (0..40).collect();
        let order = |kind| {
            let mut sim = simulator(kind, 5);
            vfns.iter()
                .map(|&vfn| match sim.touch(vfn, RefKind::Load) {
                    AccessOutcome::Fault { evicted, .. } => evicted,
                    AccessOutcome::Hit { .. } => panic!("unexpected hit"),
                })
                .collect::<Vec<_>>()
        };
        let fifo = order(PolicyKind::Fifo);
        assert_eq!(order(PolicyKind::Clock), fifo);
        assert_eq!(order(PolicyKind::SecondChance), fifo);
        assert_eq!(fifo[5], Some(0));
    }

    #[test]
    fn test_lfu_and_mfu_tie_break_on_load_order() {
        let mut lfu = simulator(PolicyKind::Lfu, 3);
        let mut mfu = simulator(PolicyKind::Mfu, 3);
        for sim in [&mut lfu, &mut mfu] {
            for vfn in [1, 2, 3, 3] {
                sim.touch(vfn, RefKind::Load);
            }
        }
        // LFU: 1 and 2 tie at one access, 1 was loaded first
        assert_eq!(
            lfu.touch(4, RefKind::Load),
            AccessOutcome::Fault {
                pfn: 0,
                evicted: Some(1)
            }
        );
        // MFU: 3 is the only page with two accesses
        assert_eq!(
            mfu.touch(4, RefKind::Load),
            AccessOutcome::Fault {
                pfn: 2,
                evicted: Some(3)
            }
        );
    }

    #[test]
    fn test_run_honors_limit() {
        let trace = RandomTrace::new(500, 16, 1024, 7);
        let config = SimConfig::new(PolicyKind::Random, 4, 1024).unwrap().with_limit(100);
        let mut sim = Simulator::new(&config).unwrap();
        assert_eq!(sim.run(trace.records().iter().copied()).unwrap(), 100);
        assert!(sim.limit_reached());
        assert_eq!(sim.stats().total_references(), 100);
        // Further input is ignored
        assert_eq!(sim.run(trace.records().iter().copied()).unwrap(), 0);

        let config = SimConfig::new(PolicyKind::Random, 4, 1024).unwrap();
        let mut sim = Simulator::new(&config).unwrap();
        assert_eq!(sim.run(trace.records().iter().copied()).unwrap(), 500);
        assert!(!sim.limit_reached());
    }

    #[test]
    fn test_run_stops_reading_at_limit() {
        let trace = RandomTrace::new(10, 8, 1024, 11);
        let config = SimConfig::new(PolicyKind::Fifo, 3, 1024).unwrap().with_limit(3);
        let mut sim = Simulator::new(&config).unwrap();
        let mut pulled = 0;
        let records = trace.records().iter().copied().inspect(|_| pulled += 1);
        assert_eq!(sim.run(records).unwrap(), 3);
        assert_eq!(pulled, 3);

        // Already at the limit: nothing more is read
        pulled = 0;
        let records = trace.records().iter().copied().inspect(|_| pulled += 1);
        assert_eq!(sim.run(records).unwrap(), 0);
        assert_eq!(pulled, 0);
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let trace = RandomTrace::new(2000, 32, 1024, 3);
        let run = || {
            let config = SimConfig::new(PolicyKind::Random, 6, 1024).unwrap();
            let mut sim = Simulator::new(&config).unwrap();
            sim.run(trace.records().iter().copied()).unwrap();
            sim.stats().clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_multi_level_addresses() {
        let config = SimConfig::new(PolicyKind::Clock, 3, 1024)
            .unwrap()
            .with_address_bits(32)
            .unwrap();
        let mut sim = Simulator::new(&config).unwrap();
        assert_eq!(sim.page_table().levels(), &[12, 10]);
        let pfns: Vec<Pfn> = [0x0000_0400, 0xffff_fc00, 0x8000_0000, 0x0000_0400, 0x1234_5678]
            .iter()
            .map(|&vaddr| {
                let outcome = sim.access(&TraceRecord::new(1, RefKind::Store, vaddr)).unwrap();
                sim.run_checks();
                outcome.pfn()
            })
            .collect();
        assert_eq!(pfns, vec![0, 1, 2, 0, 0]);
        assert_eq!(sim.stats().total_faults(), 4);
        assert_eq!(sim.stats().total_compulsory(), 4);
        assert_eq!(sim.stats().total_evictions(), 1);
    }
}
