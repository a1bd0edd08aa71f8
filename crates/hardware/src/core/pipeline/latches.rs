//! Entry types carried between pipeline stages.
//!
//! The instruction flow is: Scheduler → ICache → Decode → Issue → Execute/LSU → Writeback.
//! 1. **`FetchEntry`:** a warp and PC chosen by the scheduler.
//! 2. **`FetchedEntry`:** the fetch plus the instruction word read by the cache.
//! 3. **`Instruction`:** the full in-flight record, populated by decode, issue and execute.

use crate::common::constants::{REG_BANKS, SENTINEL_WARP, WARPS_PER_GROUP, WARP_SIZE};
use crate::common::{LaneMask, LaneWords};
use crate::isa::{Decoded, FuKind, PacketKind};

/// Scheduler output: which warp to fetch and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchEntry {
    /// Program counter.
    pub pc: u32,
    /// Warp id, or `SENTINEL_WARP` for a bubble.
    pub warp: usize,
    /// Packet epoch of the warp-group at issue time.
    pub epoch: u32,
}

impl FetchEntry {
    /// The bubble emitted when no group can issue.
    pub const SENTINEL: Self = Self {
        pc: 0,
        warp: SENTINEL_WARP,
        epoch: 0,
    };

    /// Returns `true` for the bubble.
    pub const fn is_sentinel(&self) -> bool {
        self.warp == SENTINEL_WARP
    }

    /// Warp-group of the fetch.
    pub const fn group(&self) -> usize {
        self.warp / WARPS_PER_GROUP
    }
}

/// Instruction cache output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchedEntry {
    /// The originating fetch.
    pub fetch: FetchEntry,
    /// Instruction word.
    pub raw: u32,
}

/// An in-flight instruction of one warp.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    /// Program counter.
    pub pc: u32,
    /// Warp id.
    pub warp: usize,
    /// Warp-group id.
    pub group: usize,
    /// Packet epoch it was fetched under.
    pub epoch: u32,
    /// Decoded fields.
    pub decoded: Decoded,
    /// Packet class.
    pub packet: PacketKind,
    /// Executing unit.
    pub unit: FuKind,
    /// Register bank of the warp.
    pub target_bank: usize,
    /// Lanes that execute (guard predicate).
    pub predicate: LaneMask,
    /// Value of the predicate operand read by `prr` and `jpnz`.
    pub pred_value: LaneMask,
    /// `rs1` operand per lane.
    pub rs1_val: LaneWords,
    /// `rs2` operand per lane.
    pub rs2_val: LaneWords,
    /// Old `rd` value per lane, for partial-immediate merges.
    pub rd_val: LaneWords,
    /// CSR value per lane.
    pub csr_val: LaneWords,
    /// Result per lane.
    pub wdat: LaneWords,
    /// Predicate lanes computed by compares and `prw`.
    pub pred_result: LaneMask,
    /// Redirect target for jumps that are taken.
    pub redirect: Option<u32>,
}

impl Instruction {
    /// Creates the record for a freshly decoded instruction.
    pub fn new(fetch: FetchEntry, decoded: Decoded, packet: PacketKind, predicate: LaneMask) -> Self {
        Self {
            pc: fetch.pc,
            warp: fetch.warp,
            group: fetch.group(),
            epoch: fetch.epoch,
            unit: decoded.op.unit(),
            decoded,
            packet,
            target_bank: fetch.warp % REG_BANKS,
            predicate,
            pred_value: LaneMask::NONE,
            rs1_val: [0; WARP_SIZE],
            rs2_val: [0; WARP_SIZE],
            rd_val: [0; WARP_SIZE],
            csr_val: [0; WARP_SIZE],
            wdat: [0; WARP_SIZE],
            pred_result: LaneMask::NONE,
            redirect: None,
        }
    }
}
