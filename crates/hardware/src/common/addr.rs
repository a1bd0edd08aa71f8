//! Address Spaces.
//!
//! The 32-bit address range is split into fixed regions. Every access is
//! classified before it reaches a cache or the backing store:
//! 1. **MMIO:** Reads return zero, writes are dropped.
//! 2. **Instruction:** Program text; writable only when explicitly allowed.
//! 3. **Args, Heap, Stack:** Ordinary data.
//!
//! An access must fall entirely inside a single region.

use std::fmt;
use std::ops::RangeInclusive;

/// A named region of the address map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    /// Memory-mapped I/O window at the bottom of memory.
    Mmio,
    /// Program text.
    Instr,
    /// Kernel argument block.
    Args,
    /// Global data.
    Heap,
    /// Per-thread stacks.
    Stack,
}

impl AddressSpace {
    /// All regions, in ascending address order.
    pub const ALL: [Self; 5] = [Self::Mmio, Self::Instr, Self::Args, Self::Heap, Self::Stack];

    /// Inclusive address range covered by this region.
    pub const fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Mmio => 0x0000_0000..=0x0000_0023,
            Self::Instr => 0x0000_0024..=0x000F_FFFF,
            Self::Args => 0x0010_0000..=0x00FF_FFFF,
            Self::Heap => 0x1000_0000..=0xF0FF_FFFF,
            Self::Stack => 0xF100_0000..=0xFFFF_FFFF,
        }
    }

    /// Returns `true` for the regions holding program data.
    pub const fn is_data(self) -> bool {
        matches!(self, Self::Args | Self::Heap | Self::Stack)
    }

    /// Classifies a single address.
    pub fn of(addr: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|space| space.range().contains(&addr))
    }

    /// Classifies an access of `size` bytes starting at `addr`.
    ///
    /// # Returns
    ///
    /// The region containing every byte of the access, or `None` when the
    /// access is unmapped, wraps, or crosses a region boundary.
    pub fn of_access(addr: u32, size: u32) -> Option<Self> {
        let last = addr.checked_add(size.max(1) - 1)?;
        let space = Self::of(addr)?;
        space.range().contains(&last).then_some(space)
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mmio => "mmio",
            Self::Instr => "instr",
            Self::Args => "args",
            Self::Heap => "heap",
            Self::Stack => "stack",
        };
        f.write_str(name)
    }
}
