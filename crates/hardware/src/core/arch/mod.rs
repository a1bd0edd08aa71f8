//! Architectural state of the SIMT core.
//!
//! This module contains the state visible to programs. It includes:
//! 1. **Register File:** Banked per-lane general-purpose registers.
//! 2. **Predicate File:** Per-warp lane masks with complement reads.
//! 3. **CSRs:** Per-lane control/status registers, including the thread id.

/// Control and Status Register file.
pub mod csr;

/// Predicate register file.
pub mod predicate;

/// Banked general-purpose register file.
pub mod regfile;

pub use csr::CsrFile;
pub use predicate::PredicateFile;
pub use regfile::RegisterFile;

/// All architectural state of the core, written only by writeback.
#[derive(Clone, Debug)]
pub struct ArchState {
    /// General-purpose registers.
    pub regs: RegisterFile,
    /// Predicate registers.
    pub preds: PredicateFile,
    /// Control/status registers.
    pub csrs: CsrFile,
}

impl ArchState {
    /// Creates zeroed state for `warp_count` warps.
    pub fn new(warp_count: usize) -> Self {
        Self {
            regs: RegisterFile::new(warp_count),
            preds: PredicateFile::new(warp_count),
            csrs: CsrFile::new(),
        }
    }
}
