//! Backing Store and Address-Map Checks.
//!
//! This module implements the memory behind the caches. It provides:
//! 1. **Buffer:** Sparse byte storage (`SparseBuffer`).
//! 2. **Access Policy:** Classification of every data access against the address map,
//!    including the permissive modes for out-of-range accesses and program-text writes.
//! 3. **Memory:** Word and block access for the memory controller, written-word tracking
//!    for dumps, and checked placement for the image loader.
//! 4. **Controller:** Fixed-latency service of cache block requests.

/// Sparse byte storage.
pub mod buffer;

/// Fixed-latency memory controller.
pub mod controller;

use std::collections::BTreeSet;

use tracing::warn;

use self::buffer::SparseBuffer;
use crate::common::constants::WORD_SIZE;
use crate::common::{AddressSpace, MemoryError};
use crate::config::MemoryConfig;

/// Where a checked data access should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Through the data cache to memory.
    Memory(AddressSpace),
    /// MMIO window: loads read zero, stores are dropped.
    Mmio,
    /// Out-of-range access tolerated by `allow_oob`: loads read zero, stores are dropped.
    Discard,
}

/// Address-map rules applied to every data access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Tolerate unmapped and region-crossing accesses.
    pub allow_oob: bool,
    /// Permit stores into the instruction region.
    pub allow_instr_writes: bool,
}

impl From<&MemoryConfig> for AccessPolicy {
    fn from(config: &MemoryConfig) -> Self {
        Self {
            allow_oob: config.allow_oob,
            allow_instr_writes: config.allow_instr_writes,
        }
    }
}

impl AccessPolicy {
    /// Classifies a data access.
    ///
    /// # Arguments
    ///
    /// * `addr` - First byte.
    /// * `size` - Width in bytes (1, 2 or 4).
    /// * `write` - Whether the access is a store.
    ///
    /// # Errors
    ///
    /// `Misaligned` for accesses not aligned to their width, `Unmapped` or
    /// `SpansRegions` unless `allow_oob`, and `InstrWrite` unless
    /// `allow_instr_writes`.
    pub fn check(&self, addr: u32, size: u32, write: bool) -> Result<Route, MemoryError> {
        if addr % size != 0 {
            return Err(MemoryError::Misaligned { addr, size });
        }
        let Some(space) = AddressSpace::of_access(addr, size) else {
            let err = match AddressSpace::of(addr) {
                Some(space) => MemoryError::SpansRegions { addr, size, space },
                None => MemoryError::Unmapped { addr, size },
            };
            if self.allow_oob {
                warn!(%err, "tolerating out-of-range access");
                return Ok(Route::Discard);
            }
            return Err(err);
        };
        match space {
            AddressSpace::Mmio => Ok(Route::Mmio),
            AddressSpace::Instr if write && !self.allow_instr_writes => {
                Err(MemoryError::InstrWrite { addr })
            }
            _ => Ok(Route::Memory(space)),
        }
    }
}

/// Main memory: sparse storage plus the set of words ever written.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    buffer: SparseBuffer,
    written: BTreeSet<u32>,
}

impl Memory {
    /// Creates an empty memory; every word reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the word containing `addr` (aligned down).
    pub fn read_word(&self, addr: u32) -> u32 {
        self.buffer.read_u32(addr & !(WORD_SIZE - 1))
    }

    /// Writes the word containing `addr` (aligned down) and records it as written.
    pub fn write_word(&mut self, addr: u32, value: u32) {
        let addr = addr & !(WORD_SIZE - 1);
        self.buffer.write_u32(addr, value);
        let _ = self.written.insert(addr);
    }

    /// Reads `words` consecutive words starting at `addr`.
    pub fn read_block(&self, addr: u32, words: usize) -> Vec<u32> {
        (0..words)
            .map(|i| self.read_word(addr.wrapping_add(i as u32 * WORD_SIZE)))
            .collect()
    }

    /// Writes consecutive words starting at `addr`.
    pub fn write_block(&mut self, addr: u32, data: &[u32]) {
        for (i, &word) in data.iter().enumerate() {
            self.write_word(addr.wrapping_add(i as u32 * WORD_SIZE), word);
        }
    }

    /// Places a word from an image, checking it lands in a loadable region.
    ///
    /// # Errors
    ///
    /// `Misaligned` for unaligned addresses; `Unmapped` for addresses outside
    /// the map or inside the MMIO window.
    pub fn place(&mut self, addr: u32, value: u32) -> Result<(), MemoryError> {
        if addr % WORD_SIZE != 0 {
            return Err(MemoryError::Misaligned {
                addr,
                size: WORD_SIZE,
            });
        }
        match AddressSpace::of_access(addr, WORD_SIZE) {
            Some(AddressSpace::Mmio) | None => Err(MemoryError::Unmapped {
                addr,
                size: WORD_SIZE,
            }),
            Some(_) => {
                self.write_word(addr, value);
                Ok(())
            }
        }
    }

    /// Whether the word at `addr` has ever been written.
    pub fn was_written(&self, addr: u32) -> bool {
        self.written.contains(&(addr & !(WORD_SIZE - 1)))
    }

    /// Every allocated word in ascending order, as `(address, value)`.
    pub fn words(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.buffer.page_bases().flat_map(move |base| {
            (0..buffer::PAGE_SIZE as u32)
                .step_by(WORD_SIZE as usize)
                .map(move |off| {
                    let addr = base + off;
                    (addr, self.buffer.read_u32(addr))
                })
        })
    }
}
