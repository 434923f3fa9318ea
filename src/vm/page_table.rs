/*
 * page_table.rs
 *
 * Multi-level page table keyed by virtual frame number. The number of levels
 * and the width of each level are derived from the address width and the page
 * size. The table is the sole owner of every page entry; everyone else refers
 * to an entry through its `PageId`.
 */

use std::ops::{Index, IndexMut};

use super::{
    stats::VmStats,
    types::{PageId, Pfn, RefKind, Vfn, VmStatus},
};
use crate::{
    bits::{get_bits, log_2},
    log_debug, log_trace,
};

pub const MIN_PAGE_SIZE: u32 = 16;
pub const DEFAULT_ADDRESS_BITS: u32 = 16;

/// Largest width each level may have, root first. The last level used is
/// shrunk so the widths add up to exactly the number of VFN bits.
pub const MAX_LEVEL_BITS: [u32; 3] = [12, 12, 8];

/// Per-page bookkeeping, created on the first reference to a VFN and kept for
/// the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    vfn: Vfn,
    pub(crate) pfn: Option<Pfn>, // Some iff the page is resident
    pub modified: bool,
    pub reference: bool,
    pub counter: u64,         // Global clock stamp of the last access (LRU)
    pub frequency: u64,       // Accesses since the last eviction (LFU/MFU)
    pub insertion_order: u64, // Stamped once per load (FIFO, tie-breaks)
    pub used: bool,           // Clock
    pub chance: bool,         // Second chance
}

impl PageEntry {
    fn new(vfn: Vfn) -> Self {
        PageEntry {
            vfn,
            pfn: None,
            modified: false,
            reference: false,
            counter: 0,
            frequency: 0,
            insertion_order: 0,
            used: false,
            chance: false,
        }
    }

    pub fn vfn(&self) -> Vfn {
        self.vfn
    }

    pub fn pfn(&self) -> Option<Pfn> {
        self.pfn
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.pfn.is_some()
    }
}

impl std::fmt::Display for PageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "vfn:0x{:x} pfn:{} valid:{} modified:{} reference:{} counter:{} insertion:{} frequency:{}",
            self.vfn,
            self.pfn.map_or_else(|| "-".to_string(), |p| format!("0x{:x}", p)),
            self.is_valid() as u8,
            self.modified as u8,
            self.reference as u8,
            self.counter,
            self.insertion_order,
            self.frequency
        )
    }
}

/// Index into a level's array: the next `width` most significant bits of
/// `vfn` after the `consumed` bits used by the levels above.
#[inline]
fn level_index(vfn: Vfn, vfn_bits: u32, consumed: u32, width: u32) -> usize {
    if width == 0 {
        return 0;
    }
    get_bits(vfn, vfn_bits - consumed - 1, width) as usize
}

enum Node {
    Internal(Vec<Option<Box<Node>>>),
    Leaf(Vec<Option<PageId>>),
}

impl Node {
    fn new(levels: &[u32], depth: usize) -> Self {
        let size = 1usize << levels[depth];
        if depth + 1 == levels.len() {
            Node::Leaf(vec![None; size])
        } else {
            Node::Internal((0..size).map(|_| None).collect())
        }
    }
}

pub struct PageTable {
    address_bits: u32,
    page_bits: u32,
    vfn_bits: u32,
    levels: Vec<u32>,
    root: Node,
    pages: Vec<PageEntry>,
}

/// Validate an address width / page size pair and return the page offset width.
pub fn check_geometry(address_bits: u32, page_size: u32) -> Result<u32, VmStatus> {
    if page_size < MIN_PAGE_SIZE {
        return Err(VmStatus::PageSizeTooSmall {
            size: page_size,
            min: MIN_PAGE_SIZE,
        });
    }
    let page_bits = log_2(page_size).ok_or(VmStatus::PageSizeNotPowerOfTwo(page_size))?;
    let max_vfn_bits: u32 = MAX_LEVEL_BITS.iter().sum();
    if address_bits < page_bits
        || address_bits > u32::BITS
        || address_bits - page_bits > max_vfn_bits
    {
        return Err(VmStatus::AddressBitsOutOfRange {
            bits: address_bits,
            page_bits,
        });
    }
    Ok(page_bits)
}

impl PageTable {
    pub fn new(address_bits: u32, page_size: u32) -> Result<Self, VmStatus> {
        let page_bits = check_geometry(address_bits, page_size)?;
        let vfn_bits = address_bits - page_bits;
        let levels = Self::level_widths(vfn_bits);

        log_debug!(
            "Page table created: vfn_bits: {}, {} level table {:?}",
            vfn_bits,
            levels.len(),
            levels
        );

        Ok(PageTable {
            address_bits,
            page_bits,
            vfn_bits,
            root: Node::new(&levels, 0),
            levels,
            pages: Vec::new(),
        })
    }

    /// Accumulate maximum level widths until they cover `vfn_bits`, then shrink
    /// the deepest level so the sum is exact.
    fn level_widths(vfn_bits: u32) -> Vec<u32> {
        let mut levels = Vec::with_capacity(MAX_LEVEL_BITS.len());
        let mut bits = 0;
        for &max_bits in MAX_LEVEL_BITS.iter() {
            bits += max_bits;
            levels.push(max_bits);
            if bits >= vfn_bits {
                break;
            }
        }
        if let Some(last) = levels.last_mut() {
            *last -= bits - vfn_bits;
        }
        levels
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    pub fn page_bits(&self) -> u32 {
        self.page_bits
    }

    pub fn vfn_bits(&self) -> u32 {
        self.vfn_bits
    }

    /// Bit width of each instantiated level, root first.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// Number of page entries created so far (distinct VFNs seen).
    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// Strip the page offset: the top `vfn_bits` of the low `address_bits` of `vaddr`.
    #[inline]
    pub fn vaddr_to_vfn(&self, vaddr: u32) -> Vfn {
        get_bits(vaddr, self.address_bits - 1, self.vfn_bits)
    }

    /// Find the entry for `vfn`, creating it (and any missing table levels) on
    /// first sight. Creation counts as a compulsory fault for `kind`.
    pub fn lookup(&mut self, vfn: Vfn, kind: RefKind, stats: &mut VmStats) -> Result<PageId, VmStatus> {
        if u64::from(vfn) >> self.vfn_bits != 0 {
            return Err(VmStatus::VfnOutOfRange {
                vfn,
                vfn_bits: self.vfn_bits,
            });
        }

        let PageTable {
            vfn_bits,
            levels,
            root,
            pages,
            ..
        } = self;
        let (vfn_bits, levels) = (*vfn_bits, &*levels);

        let mut consumed = 0;
        let mut node = root;
        for (depth, &width) in levels.iter().enumerate() {
            let index = level_index(vfn, vfn_bits, consumed, width);
            consumed += width;
            match node {
                Node::Internal(children) => {
                    node = children[index]
                        .get_or_insert_with(|| Box::new(Node::new(levels, depth + 1)))
                        .as_mut();
                }
                Node::Leaf(slots) => {
                    let id = match slots[index] {
                        Some(id) => id,
                        None => {
                            // Compulsory miss - first access
                            stats.inc_compulsory(kind);
                            let id = pages.len();
                            pages.push(PageEntry::new(vfn));
                            slots[index] = Some(id);
                            log_trace!("New page entry: vfn: 0x{:x} id: {}", vfn, id);
                            id
                        }
                    };
                    return Ok(id);
                }
            }
        }
        unreachable!("page table has no leaf level")
    }

    /// Entry for `vfn` if it was ever looked up. Never allocates.
    pub fn get(&self, vfn: Vfn) -> Option<&PageEntry> {
        if u64::from(vfn) >> self.vfn_bits != 0 {
            return None;
        }
        let mut consumed = 0;
        let mut node = &self.root;
        for &width in self.levels.iter() {
            let index = level_index(vfn, self.vfn_bits, consumed, width);
            consumed += width;
            match node {
                Node::Internal(children) => node = children[index].as_deref()?,
                Node::Leaf(slots) => return slots[index].map(|id| &self.pages[id]),
            }
        }
        None
    }

    /// All entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PageId, &PageEntry)> {
        self.pages.iter().enumerate()
    }

    /// Write one line per entry at debug level.
    pub fn dump(&self) {
        for (id, page) in self.iter() {
            log_debug!("page[{}]: {}", id, page);
        }
    }
}

impl Index<PageId> for PageTable {
    type Output = PageEntry;

    fn index(&self, id: PageId) -> &Self::Output {
        &self.pages[id]
    }
}

impl IndexMut<PageId> for PageTable {
    fn index_mut(&mut self, id: PageId) -> &mut Self::Output {
        &mut self.pages[id]
    }
}
