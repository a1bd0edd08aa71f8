//! Predicate Register File.
//!
//! Each warp owns `NUM_PREDS` lane masks. A read can return the mask or its
//! complement, which is how a compare steers both sides of an if/else.
//! Slot 0 is hardwired to all lanes active and ignores writes; every other
//! slot starts cleared.

use crate::common::LaneMask;
use crate::common::constants::NUM_PREDS;

/// Per-warp predicate masks.
#[derive(Clone, Debug)]
pub struct PredicateFile {
    masks: Vec<[LaneMask; NUM_PREDS]>,
}

impl PredicateFile {
    /// Creates a predicate file for `warp_count` warps.
    pub fn new(warp_count: usize) -> Self {
        Self {
            masks: vec![[LaneMask::NONE; NUM_PREDS]; warp_count],
        }
    }

    /// Reads a predicate slot.
    ///
    /// # Arguments
    ///
    /// * `warp` - Warp id.
    /// * `slot` - Predicate index (0-31).
    /// * `negate` - Return the complement instead of the stored mask.
    pub fn read(&self, warp: usize, slot: usize, negate: bool) -> LaneMask {
        let mask = if slot == 0 { LaneMask::ALL } else { self.masks[warp][slot] };
        if negate { !mask } else { mask }
    }

    /// Overwrites a predicate slot. Writes to slot 0 are dropped.
    pub fn write(&mut self, warp: usize, slot: usize, mask: LaneMask) {
        if slot != 0 {
            self.masks[warp][slot] = mask;
        }
    }

    /// Updates only the lanes in `lanes`, leaving the others untouched.
    pub fn write_lanes(&mut self, warp: usize, slot: usize, values: LaneMask, lanes: LaneMask) {
        if slot != 0 {
            let old = self.masks[warp][slot];
            self.masks[warp][slot] = (old & !lanes) | (values & lanes);
        }
    }
}
