//! Register dependency scoreboard.
//!
//! One 64-bit mask per warp, bit `r` set while an issued instruction that
//! writes `xr` has not yet retired. Issue holds back any instruction whose
//! sources or destination are pending, which covers both RAW and WAW hazards
//! between the in-order instruction buffer and the variable-latency units.

use crate::isa::Decoded;

/// Per-warp pending-write masks.
#[derive(Clone, Debug)]
pub struct Scoreboard {
    pending: Vec<u64>,
}

impl Scoreboard {
    /// Create a scoreboard with no pending writes.
    pub fn new(warp_count: usize) -> Self {
        Self {
            pending: vec![0; warp_count],
        }
    }

    /// Whether `reg` of `warp` has a pending writer. `x0` never does.
    pub fn is_pending(&self, warp: usize, reg: usize) -> bool {
        reg != 0 && self.pending[warp] >> reg & 1 == 1
    }

    /// Whether `d` can issue for `warp` without a register hazard.
    pub fn can_issue(&self, warp: usize, d: &Decoded) -> bool {
        d.sources().chain(d.rd).all(|reg| !self.is_pending(warp, reg))
    }

    /// Mark the destination of `d` pending. No-op for `x0` or no destination.
    pub fn reserve(&mut self, warp: usize, d: &Decoded) {
        if let Some(rd) = d.rd.filter(|&rd| rd != 0) {
            self.pending[warp] |= 1 << rd;
        }
    }

    /// Clear the destination of `d` on retire.
    pub fn release(&mut self, warp: usize, d: &Decoded) {
        if let Some(rd) = d.rd {
            self.pending[warp] &= !(1 << rd);
        }
    }

    /// Whether any register of any warp is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.iter().all(|&mask| mask == 0)
    }
}
