//! Sparse Memory Buffer.
//!
//! The address map spans the full 32-bit range, but programs touch a few
//! kilobytes of it. This buffer allocates 4 KiB pages on first write and
//! reads untouched memory as zero. Pages live in a `BTreeMap`, so iteration
//! is in ascending address order.

use std::collections::BTreeMap;

/// Page size in bytes.
pub const PAGE_SIZE: usize = 4096;

const PAGE_SHIFT: u32 = PAGE_SIZE.trailing_zeros();

/// Byte-addressable little-endian storage allocated page by page.
#[derive(Clone, Debug, Default)]
pub struct SparseBuffer {
    pages: BTreeMap<u32, Box<[u8; PAGE_SIZE]>>,
}

impl SparseBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    const fn split(addr: u32) -> (u32, usize) {
        (addr >> PAGE_SHIFT, (addr as usize) & (PAGE_SIZE - 1))
    }

    /// Reads one byte; unallocated memory reads as zero.
    pub fn read_u8(&self, addr: u32) -> u8 {
        let (page, offset) = Self::split(addr);
        self.pages.get(&page).map_or(0, |p| p[offset])
    }

    /// Writes one byte, allocating its page if needed.
    pub fn write_u8(&mut self, addr: u32, value: u8) {
        let (page, offset) = Self::split(addr);
        self.pages
            .entry(page)
            .or_insert_with(|| Box::new([0; PAGE_SIZE]))[offset] = value;
    }

    /// Reads `N` bytes starting at `addr`, wrapping at the top of memory.
    pub fn read_bytes<const N: usize>(&self, addr: u32) -> [u8; N] {
        std::array::from_fn(|i| self.read_u8(addr.wrapping_add(i as u32)))
    }

    /// Writes `bytes` starting at `addr`, wrapping at the top of memory.
    pub fn write_bytes(&mut self, addr: u32, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), b);
        }
    }

    /// Reads a little-endian word.
    pub fn read_u32(&self, addr: u32) -> u32 {
        u32::from_le_bytes(self.read_bytes::<4>(addr))
    }

    /// Writes a little-endian word.
    pub fn write_u32(&mut self, addr: u32, value: u32) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    /// Base addresses of every allocated page, ascending.
    pub fn page_bases(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().map(|&page| page << PAGE_SHIFT)
    }
}
