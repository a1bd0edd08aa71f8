//! Per-instruction lane tracking for the load/store unit.
//!
//! A warp-wide memory instruction becomes one [`LsuEntry`]: the per-lane
//! addresses, a finished mask and a waiting mask. Lanes are served one
//! request at a time, but a response is applied to every lane it can satisfy:
//! a hit completes every load lane reading the same word, and an accepted
//! miss parks every load lane in the same block until the fill arrives.

use crate::common::constants::WORD_SIZE;
use crate::common::{LaneMask, LaneWords};
use crate::core::pipeline::latches::Instruction;

/// Extracts a sign-extended load value of `size` bytes at `addr` from the
/// word containing it.
pub const fn extract(word: u32, addr: u32, size: u32) -> u32 {
    let shift = (addr % WORD_SIZE) * 8;
    match size {
        1 => (word >> shift) as u8 as i8 as i32 as u32,
        2 => (word >> shift) as u16 as i16 as i32 as u32,
        _ => word,
    }
}

/// One memory instruction in the load/store queue.
#[derive(Clone, Debug)]
pub struct LsuEntry {
    /// Queue-unique id.
    pub id: u64,
    /// The instruction; loads collect their lane data in `wdat`.
    pub inst: Instruction,
    /// Effective address per lane.
    pub addrs: LaneWords,
    /// Access width in bytes.
    pub size: u32,
    /// Whether this is a store.
    pub store: bool,
    /// Lanes whose access is complete.
    pub finished: LaneMask,
    /// Load lanes parked on an outstanding block fill.
    pub waiting: LaneMask,
}

impl LsuEntry {
    /// Lanes that still need a cache request.
    pub fn pending(&self) -> LaneMask {
        self.inst.predicate & !self.finished & !self.waiting
    }

    /// Whether every active lane is finished.
    pub fn is_complete(&self) -> bool {
        (self.inst.predicate & !self.finished) == LaneMask::NONE
    }

    /// Finishes a load lane with `value`, or a store lane.
    pub fn finish(&mut self, lane: usize, value: u32) {
        if !self.store {
            self.inst.wdat[lane] = value;
        }
        self.finished.set(lane, true);
        self.waiting.set(lane, false);
    }

    /// Parks every unfinished load lane whose address falls in `block`.
    pub fn park(&mut self, block: u32, block_bytes: u32) {
        for lane in self.pending().iter() {
            if self.addrs[lane] - self.addrs[lane] % block_bytes == block {
                self.waiting.set(lane, true);
            }
        }
    }

    /// Wakes every parked lane whose address falls in `block`.
    pub fn wake(&mut self, block: u32, block_bytes: u32) {
        for lane in self.waiting.iter() {
            if self.addrs[lane] - self.addrs[lane] % block_bytes == block {
                self.waiting.set(lane, false);
            }
        }
    }

    /// Completes every unfinished load lane that reads the word at `addr`.
    pub fn complete_word(&mut self, addr: u32, word: u32) {
        let word_addr = addr & !(WORD_SIZE - 1);
        let lanes = self.inst.predicate & !self.finished;
        for lane in lanes.iter() {
            let lane_addr = self.addrs[lane];
            if lane_addr & !(WORD_SIZE - 1) == word_addr {
                self.finish(lane, extract(word, lane_addr, self.size));
            }
        }
    }
}
