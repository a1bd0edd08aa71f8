//! Banked General-Purpose Register File.
//!
//! This module implements the per-lane register storage. It performs the following:
//! 1. **Banking:** Warp `w` lives in bank `w % REG_BANKS`, slot `w / REG_BANKS`,
//!    so the two warps of a group never share a bank.
//! 2. **Invariant Enforcement:** Register `x0` reads as zero in every lane and drops writes.
//! 3. **Masked Writes:** Only lanes selected by a `LaneMask` are updated.
//! 4. **Debugging:** Dumps every warp with live register state.

use std::io::{self, Write};

use crate::common::constants::{NUM_REGS, REG_BANKS, WARP_SIZE};
use crate::common::{LaneMask, LaneWords};

/// Registers of one warp: `[reg][lane]`.
type WarpRegs = [LaneWords; NUM_REGS];

/// Banked per-lane register file.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    banks: [Vec<WarpRegs>; REG_BANKS],
    warp_count: usize,
}

impl RegisterFile {
    /// Creates a zeroed register file for `warp_count` warps.
    pub fn new(warp_count: usize) -> Self {
        let per_bank = warp_count.div_ceil(REG_BANKS);
        Self {
            banks: std::array::from_fn(|_| vec![[[0; WARP_SIZE]; NUM_REGS]; per_bank]),
            warp_count,
        }
    }

    /// Bank holding `warp`.
    #[inline]
    pub const fn bank_of(warp: usize) -> usize {
        warp % REG_BANKS
    }

    /// Number of warps backed by this file.
    pub const fn warp_count(&self) -> usize {
        self.warp_count
    }

    #[inline]
    fn regs(&self, warp: usize) -> &WarpRegs {
        &self.banks[warp % REG_BANKS][warp / REG_BANKS]
    }

    /// Reads every lane of a register.
    ///
    /// # Arguments
    ///
    /// * `warp` - Warp id.
    /// * `reg` - Register index (0-63).
    ///
    /// # Returns
    ///
    /// The per-lane values; all zero for `x0`.
    pub fn read(&self, warp: usize, reg: usize) -> LaneWords {
        if reg == 0 { [0; WARP_SIZE] } else { self.regs(warp)[reg] }
    }

    /// Reads a single lane of a register.
    pub fn read_lane(&self, warp: usize, reg: usize, lane: usize) -> u32 {
        if reg == 0 { 0 } else { self.regs(warp)[reg][lane] }
    }

    /// Writes the lanes of a register selected by `mask`.
    ///
    /// # Arguments
    ///
    /// * `warp` - Warp id.
    /// * `reg` - Register index; writes to `x0` are dropped.
    /// * `values` - Per-lane data.
    /// * `mask` - Lanes to update.
    pub fn write(&mut self, warp: usize, reg: usize, values: &LaneWords, mask: LaneMask) {
        if reg == 0 {
            return;
        }
        let dst = &mut self.banks[warp % REG_BANKS][warp / REG_BANKS][reg];
        for lane in mask.iter() {
            dst[lane] = values[lane];
        }
    }

    /// Writes a single lane of a register.
    pub fn write_lane(&mut self, warp: usize, reg: usize, lane: usize, value: u32) {
        if reg != 0 {
            self.banks[warp % REG_BANKS][warp / REG_BANKS][reg][lane] = value;
        }
    }

    /// Writes every warp that holds a non-zero register, one register per line.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        for warp in 0..self.warp_count {
            let regs = self.regs(warp);
            if regs.iter().all(|lanes| lanes.iter().all(|&v| v == 0)) {
                continue;
            }
            writeln!(out, "warp {warp}")?;
            for (reg, lanes) in regs.iter().enumerate().skip(1) {
                if lanes.iter().all(|&v| v == 0) {
                    continue;
                }
                write!(out, "  x{reg:<2}")?;
                for value in lanes {
                    write!(out, " {value:08x}")?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
