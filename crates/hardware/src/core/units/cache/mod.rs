//! Lockup-Free Caches.
//!
//! This module implements the two L1 caches of the SIMT core. It provides:
//! 1. **Geometry:** Address split into `[tag | set | bank | offset]`.
//! 2. **Tag Arrays:** Set-associative frames holding block data, with LRU replacement.
//! 3. **MSHRs:** Miss tables that merge requests to a block with an outstanding fill.
//! 4. **Instruction Cache:** Read-only, in-order delivery to decode.
//! 5. **Data Cache:** Banked, write-back, write-allocate, serving the load/store unit.

/// Banked data cache.
pub mod dcache;

/// Instruction cache.
pub mod icache;

/// LRU replacement state.
pub mod lru;

/// Miss status holding registers.
pub mod mshr;

use self::lru::LruPolicy;
use crate::common::constants::WORD_SIZE;

pub use dcache::{DataCache, DataRequest, DataResponse};
pub use icache::InstructionCache;

/// Address decomposition for a (possibly banked) set-associative cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Block size in bytes.
    pub block_bytes: u32,
    /// Number of banks; consecutive blocks go to consecutive banks.
    pub banks: u32,
    /// Sets per bank.
    pub sets: u32,
    /// Ways per set.
    pub ways: usize,
}

impl Geometry {
    /// Block number of `addr`.
    #[inline]
    pub const fn block(&self, addr: u32) -> u32 {
        addr / self.block_bytes
    }

    /// Block-aligned base address of `addr`.
    #[inline]
    pub const fn block_addr(&self, addr: u32) -> u32 {
        addr - addr % self.block_bytes
    }

    /// Bank holding `addr`.
    #[inline]
    pub const fn bank(&self, addr: u32) -> usize {
        (self.block(addr) % self.banks) as usize
    }

    /// Set within the bank.
    #[inline]
    pub const fn set(&self, addr: u32) -> usize {
        (self.block(addr) / self.banks % self.sets) as usize
    }

    /// Tag.
    #[inline]
    pub const fn tag(&self, addr: u32) -> u32 {
        self.block(addr) / (self.banks * self.sets)
    }

    /// Word index of `addr` within its block.
    #[inline]
    pub const fn word(&self, addr: u32) -> usize {
        ((addr % self.block_bytes) / WORD_SIZE) as usize
    }

    /// Words per block.
    #[inline]
    pub const fn words(&self) -> usize {
        (self.block_bytes / WORD_SIZE) as usize
    }

    /// Rebuilds a block base address from its parts.
    #[inline]
    pub const fn base(&self, tag: u32, set: usize, bank: usize) -> u32 {
        ((tag * self.sets + set as u32) * self.banks + bank as u32) * self.block_bytes
    }
}

/// One cache frame.
#[derive(Clone, Debug, Default)]
pub struct CacheLine {
    /// Address tag.
    pub tag: u32,
    /// Frame holds a block.
    pub valid: bool,
    /// Block differs from memory.
    pub dirty: bool,
    /// Block contents, one word per entry.
    pub data: Vec<u32>,
}

/// A valid line pushed out by an install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// Block base address.
    pub addr: u32,
    /// Block contents.
    pub data: Vec<u32>,
    /// Whether it must be written back.
    pub dirty: bool,
}

/// Frames of one bank.
#[derive(Clone, Debug)]
pub struct TagArray {
    lines: Vec<CacheLine>,
    ways: usize,
    lru: LruPolicy,
}

impl TagArray {
    /// Creates an empty array of `sets × ways` frames of `words` words.
    pub fn new(sets: usize, ways: usize, words: usize) -> Self {
        Self {
            lines: vec![
                CacheLine {
                    data: vec![0; words],
                    ..CacheLine::default()
                };
                sets * ways
            ],
            ways,
            lru: LruPolicy::new(sets, ways),
        }
    }

    /// Way of `set` holding `tag`, if present.
    pub fn lookup(&self, set: usize, tag: u32) -> Option<usize> {
        let base = set * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Marks a way most recently used.
    pub fn touch(&mut self, set: usize, way: usize) {
        self.lru.touch(set, way);
    }

    /// Frame at `(set, way)`.
    pub fn line(&self, set: usize, way: usize) -> &CacheLine {
        &self.lines[set * self.ways + way]
    }

    /// Mutable frame at `(set, way)`.
    pub fn line_mut(&mut self, set: usize, way: usize) -> &mut CacheLine {
        &mut self.lines[set * self.ways + way]
    }

    /// Installs a block into the LRU way of `set`.
    ///
    /// # Returns
    ///
    /// The way used and the valid line it replaced, with its base address
    /// rebuilt by `base_of(old_tag)`.
    pub fn install(
        &mut self,
        set: usize,
        tag: u32,
        data: Vec<u32>,
        base_of: impl FnOnce(u32) -> u32,
    ) -> (usize, Option<Evicted>) {
        let way = self.lru.victim(set);
        let line = &mut self.lines[set * self.ways + way];
        let evicted = if line.valid {
            Some(Evicted {
                addr: base_of(line.tag),
                data: std::mem::take(&mut line.data),
                dirty: line.dirty,
            })
        } else {
            None
        };
        *line = CacheLine {
            tag,
            valid: true,
            dirty: false,
            data,
        };
        self.lru.touch(set, way);
        (way, evicted)
    }

    /// Every valid dirty line as `(set, way)`.
    pub fn dirty_lines(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.valid && line.dirty)
            .map(|(i, _)| (i / self.ways, i % self.ways))
    }
}
