use super::{
    page_table::{PageEntry, PageTable},
    stats::VmStats,
    types::{PageId, Pfn, RefKind},
};
use crate::{log_debug, log_trace};

pub const MIN_PHYS_PAGES: usize = 3;

/// Fixed array of physical frames. A frame either is empty or refers to the
/// page-table entry that currently occupies it. The page table owns the
/// entries; frames only record occupancy.
pub struct PhysicalMemory {
    frames: Vec<Option<PageId>>,
}

impl PhysicalMemory {
    /// Callers validate `num_frames` against `MIN_PHYS_PAGES` at configuration time.
    pub fn new(num_frames: usize) -> Self {
        log_debug!("Physical memory created: num_frames: {}", num_frames);
        PhysicalMemory {
            frames: vec![None; num_frames],
        }
    }

    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn get(&self, pfn: Pfn) -> Option<PageId> {
        self.frames[pfn]
    }

    pub fn num_occupied(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pfn, Option<PageId>)> + '_ {
        self.frames.iter().copied().enumerate()
    }

    /// Evict whatever occupies `pfn`, charging the eviction to `kind`.
    /// An empty frame, or one whose page is already invalid, is left as is.
    /// Returns the evicted page.
    pub fn evict(
        &mut self,
        pfn: Pfn,
        kind: RefKind,
        page_table: &mut PageTable,
        stats: &mut VmStats,
    ) -> Option<PageId> {
        assert!(pfn < self.capacity(), "pfn {} out of range", pfn);

        let id = self.frames[pfn]?;
        let page = &mut page_table[id];
        if !page.is_valid() {
            return None;
        }
        assert_eq!(page.pfn, Some(pfn), "frame {} does not own page {}", pfn, id);
        self.frames[pfn] = None;

        stats.inc_eviction(kind);
        if page.modified {
            stats.inc_dirty_eviction(kind);
        }
        log_trace!("Page evicted: pfn: {} vfn: 0x{:x} dirty: {}", pfn, page.vfn(), page.modified);
        page.frequency = 0;
        page.modified = false;
        page.pfn = None;
        Some(id)
    }

    /// Install page `id` into the empty frame `pfn`.
    pub fn load(&mut self, pfn: Pfn, id: PageId, page_table: &mut PageTable) {
        assert!(pfn < self.capacity(), "pfn {} out of range", pfn);
        assert!(self.frames[pfn].is_none(), "frame {} is not empty", pfn);
        let page = &mut page_table[id];
        assert!(!page.is_valid(), "page {} is already resident", id);

        self.frames[pfn] = Some(id);
        page.pfn = Some(pfn);
        page.reference = false;
        page.modified = false;
        log_trace!("Page loaded: pfn: {} vfn: 0x{:x}", pfn, page.vfn());
    }

    /// View of the resident pages handed to eviction policies.
    pub fn resident<'a>(&'a self, page_table: &'a mut PageTable) -> ResidentFrames<'a> {
        ResidentFrames {
            frames: &self.frames,
            page_table,
        }
    }

    /// Write one line per frame at debug level.
    pub fn dump(&self, page_table: &PageTable) {
        for (pfn, id) in self.iter() {
            if let Some(id) = id {
                log_debug!("physmem[0x{:x}]: {}", pfn, page_table[id]);
            }
        }
    }

    #[cfg(test)]
    pub fn run_checks(&self, page_table: &PageTable) {
        self.check_frame_and_page_match(page_table);
        self.check_valid_pages_resident(page_table);
    }

    // Invariant: an occupied frame's page is valid and points back at the frame
    #[cfg(test)]
    pub fn check_frame_and_page_match(&self, page_table: &PageTable) {
        for (pfn, id) in self.iter() {
            if let Some(id) = id {
                assert_eq!(page_table[id].pfn(), Some(pfn));
            }
        }
    }

    // Invariant: a page is valid iff exactly one frame refers to it
    #[cfg(test)]
    pub fn check_valid_pages_resident(&self, page_table: &PageTable) {
        for (id, page) in page_table.iter() {
            let holders = self.iter().filter(|(_, f)| *f == Some(id)).count();
            assert_eq!(holders, page.is_valid() as usize, "page {} residency", id);
        }
    }
}

/// Resident pages indexed by frame. Policies read the per-page counters
/// through it and may flip the clock / second-chance bits.
pub struct ResidentFrames<'a> {
    frames: &'a [Option<PageId>],
    page_table: &'a mut PageTable,
}

impl<'a> ResidentFrames<'a> {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn id(&self, pfn: Pfn) -> PageId {
        match self.frames[pfn] {
            Some(id) => id,
            None => panic!("frame {} is empty after warm-up", pfn),
        }
    }

    pub fn page(&self, pfn: Pfn) -> &PageEntry {
        &self.page_table[self.id(pfn)]
    }

    pub fn page_mut(&mut self, pfn: Pfn) -> &mut PageEntry {
        let id = self.id(pfn);
        &mut self.page_table[id]
    }

    /// Frames in index order with their pages. Every frame must be occupied.
    pub fn iter(&self) -> impl Iterator<Item = (Pfn, &PageEntry)> + '_ {
        (0..self.len()).map(move |pfn| (pfn, self.page(pfn)))
    }
}
