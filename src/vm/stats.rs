use super::types::RefKind;

type KindCounts = [u64; RefKind::NUM];

/// Per reference-kind counters for one simulation run.
/// Counters only grow; they are bumped by the simulator, page table and
/// physical memory and are read-only to everyone else.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VmStats {
    references: KindCounts,
    faults: KindCounts,
    compulsory: KindCounts,
    evictions: KindCounts,
    dirty_evictions: KindCounts,
}

impl VmStats {
    pub fn new() -> Self {
        VmStats::default()
    }

    #[inline]
    pub(crate) fn inc_reference(&mut self, kind: RefKind) {
        self.references[kind.index()] += 1;
    }

    #[inline]
    pub(crate) fn inc_fault(&mut self, kind: RefKind) {
        self.faults[kind.index()] += 1;
    }

    #[inline]
    pub(crate) fn inc_compulsory(&mut self, kind: RefKind) {
        self.compulsory[kind.index()] += 1;
    }

    #[inline]
    pub(crate) fn inc_eviction(&mut self, kind: RefKind) {
        self.evictions[kind.index()] += 1;
    }

    #[inline]
    pub(crate) fn inc_dirty_eviction(&mut self, kind: RefKind) {
        self.dirty_evictions[kind.index()] += 1;
    }

    pub fn references(&self, kind: RefKind) -> u64 {
        self.references[kind.index()]
    }

    pub fn faults(&self, kind: RefKind) -> u64 {
        self.faults[kind.index()]
    }

    pub fn compulsory(&self, kind: RefKind) -> u64 {
        self.compulsory[kind.index()]
    }

    pub fn evictions(&self, kind: RefKind) -> u64 {
        self.evictions[kind.index()]
    }

    pub fn dirty_evictions(&self, kind: RefKind) -> u64 {
        self.dirty_evictions[kind.index()]
    }

    pub fn total_references(&self) -> u64 {
        self.references.iter().sum()
    }

    pub fn total_faults(&self) -> u64 {
        self.faults.iter().sum()
    }

    pub fn total_compulsory(&self) -> u64 {
        self.compulsory.iter().sum()
    }

    pub fn total_evictions(&self) -> u64 {
        self.evictions.iter().sum()
    }

    pub fn total_dirty_evictions(&self) -> u64 {
        self.dirty_evictions.iter().sum()
    }

    /// Rows of `(label, per-kind counts)` in report order.
    pub fn rows(&self) -> [(&'static str, KindCounts); 5] {
        [
            ("Memory references", self.references),
            ("Page Faults", self.faults),
            ("Compulsory Page Faults", self.compulsory),
            ("Page Evictions", self.evictions),
            ("(Dirty) Page Writes", self.dirty_evictions),
        ]
    }

    /// Fraction of references that hit, in `[0, 1]`. `None` before any reference.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.total_references();
        if total == 0 {
            None
        } else {
            Some((total - self.total_faults()) as f64 / total as f64)
        }
    }
}

impl std::fmt::Display for VmStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (label, counts) in self.rows().iter() {
            writeln!(
                f,
                "{:25}: {:>10} {:>10} {:>10} | {:>10}",
                label,
                counts[RefKind::Code.index()],
                counts[RefKind::Load.index()],
                counts[RefKind::Store.index()],
                counts.iter().sum::<u64>()
            )?;
        }
        Ok(())
    }
}
