//! Control and Status Registers.
//!
//! CSRs are per lane. Most are plain storage written by `csrw`; the
//! thread-id CSR is computed from the warp and lane and ignores writes.

use std::collections::HashMap;

use crate::common::{LaneMask, LaneWords};
use crate::common::constants::{CSR_THREAD_ID, WARP_SIZE};

/// Sparse per-warp, per-lane CSR storage.
#[derive(Clone, Debug, Default)]
pub struct CsrFile {
    values: HashMap<(usize, u16), LaneWords>,
}

impl CsrFile {
    /// Creates an empty CSR file; unwritten CSRs read as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a CSR for every lane of `warp`.
    pub fn read(&self, warp: usize, csr: u16) -> LaneWords {
        if csr == CSR_THREAD_ID {
            return std::array::from_fn(|lane| (warp * WARP_SIZE + lane) as u32);
        }
        self.values.get(&(warp, csr)).copied().unwrap_or([0; WARP_SIZE])
    }

    /// Writes the active lanes of a CSR. Read-only CSRs ignore the write.
    pub fn write(&mut self, warp: usize, csr: u16, values: &LaneWords, mask: LaneMask) {
        if csr == CSR_THREAD_ID {
            return;
        }
        let slot = self.values.entry((warp, csr)).or_insert([0; WARP_SIZE]);
        for lane in mask.iter() {
            slot[lane] = values[lane];
        }
    }
}
