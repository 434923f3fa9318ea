pub type Vfn = u32; // Virtual frame number
pub type Pfn = usize; // Physical frame number (index into physical memory)
pub type PageId = usize; // Handle of a page entry owned by the page table
pub type Pid = i32;

/// Kind of memory reference. Every statistic is bucketed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefKind {
    Code = 0,
    Load = 1,
    Store = 2,
}

impl RefKind {
    pub const NUM: usize = 3;
    pub const ALL: [RefKind; RefKind::NUM] = [RefKind::Code, RefKind::Load, RefKind::Store];

    /// `R` is a load, `W` a store, anything else an instruction fetch.
    pub fn from_mode(mode: char) -> Self {
        match mode {
            'R' => RefKind::Load,
            'W' => RefKind::Store,
            _ => RefKind::Code,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Code => write!(f, "code"),
            RefKind::Load => write!(f, "load"),
            RefKind::Store => write!(f, "store"),
        }
    }
}

/// One line of a memory trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub pid: Pid,
    pub kind: RefKind,
    pub vaddr: u32,
}

impl TraceRecord {
    pub fn new(pid: Pid, kind: RefKind, vaddr: u32) -> Self {
        TraceRecord { pid, kind, vaddr }
    }
}

impl std::fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(pid:{}, {}, 0x{:x})", self.pid, self.kind, self.vaddr)
    }
}

#[derive(Debug, PartialEq)]
pub enum VmStatus {
    PageSizeTooSmall { size: u32, min: u32 },
    PageSizeNotPowerOfTwo(u32),
    AddressBitsOutOfRange { bits: u32, page_bits: u32 },
    TooFewFrames { frames: usize, min: usize },
    UnknownPolicy(String),
    VfnOutOfRange { vfn: Vfn, vfn_bits: u32 },
    Io(String),
}

impl From<std::io::Error> for VmStatus {
    fn from(e: std::io::Error) -> Self {
        VmStatus::Io(e.to_string())
    }
}

impl std::fmt::Display for VmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmStatus::PageSizeTooSmall { size, min } => {
                write!(f, "[VM] Page size {} is smaller than {} bytes", size, min)
            }
            VmStatus::PageSizeNotPowerOfTwo(size) => {
                write!(f, "[VM] Page size {} must be a power of 2", size)
            }
            VmStatus::AddressBitsOutOfRange { bits, page_bits } => write!(
                f,
                "[VM] Address width {} bits must be in {}..=32 for this page size",
                bits, page_bits
            ),
            VmStatus::TooFewFrames { frames, min } => {
                write!(f, "[VM] Must have at least {} pages, got {}", min, frames)
            }
            VmStatus::UnknownPolicy(name) => {
                write!(f, "[VM] No algorithm named '{}' available", name)
            }
            VmStatus::VfnOutOfRange { vfn, vfn_bits } => write!(
                f,
                "[VM] Virtual frame 0x{:x} does not fit in {} bits",
                vfn, vfn_bits
            ),
            VmStatus::Io(msg) => write!(f, "[VM] I/O error: {}", msg),
        }
    }
}

impl std::error::Error for VmStatus {}
