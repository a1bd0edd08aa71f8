//! Sideband signals fed back into the warp scheduler.
//!
//! Each signal travels over its own [`ForwardingIf`](super::latch::ForwardingIf):
//! 1. **Decode:** packet class of the instruction just decoded.
//! 2. **Issue:** per-group instruction-buffer-full bitmap.
//! 3. **Branch:** redirect target for a warp-group.
//! 4. **Writeback:** one retired instruction of a warp-group.
//!
//! The instruction cache link carries a bare `bool` hit flag.

use super::latch::ForwardingIf;
use crate::isa::PacketKind;

/// Packet class of a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeSignal {
    /// Packet class.
    pub kind: PacketKind,
    /// Warp the instruction belongs to.
    pub warp: usize,
    /// PC of the instruction.
    pub pc: u32,
}

/// Per-group instruction buffer occupancy; `true` means the group's buffer is full.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueBitmap(pub Vec<bool>);

impl IssueBitmap {
    /// Whether `group`'s buffer is full. Groups beyond the bitmap read as not full.
    pub fn is_full(&self, group: usize) -> bool {
        self.0.get(group).copied().unwrap_or(false)
    }
}

/// Control transfer resolved by the branch unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchSignal {
    /// Warp-group to redirect.
    pub group: usize,
    /// New PC.
    pub dest: u32,
}

/// An instruction of a warp-group has retired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WritebackSignal {
    /// Warp-group the instruction belonged to.
    pub group: usize,
}

/// Every feedback link into the scheduler, plus the instruction cache hit link.
#[derive(Debug, Clone)]
pub struct FeedbackLinks {
    /// Instruction cache hit flag and miss wait.
    pub icache: ForwardingIf<bool>,
    /// Decode packet class.
    pub decode: ForwardingIf<DecodeSignal>,
    /// Issue buffer-full bitmap.
    pub issue: ForwardingIf<IssueBitmap>,
    /// Branch redirects.
    pub branch: ForwardingIf<BranchSignal>,
    /// Writeback completions.
    pub writeback: ForwardingIf<WritebackSignal>,
}

impl Default for FeedbackLinks {
    fn default() -> Self {
        Self {
            icache: ForwardingIf::new("icache_hit"),
            decode: ForwardingIf::new("decode_signal"),
            issue: ForwardingIf::new("issue_bitmap"),
            branch: ForwardingIf::new("branch_redirect"),
            writeback: ForwardingIf::new("writeback_signal"),
        }
    }
}
