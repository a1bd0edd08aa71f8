//! Global Machine Constants.
//!
//! This module defines machine-wide constants used across the simulator. It includes:
//! 1. **Topology Constants:** Lanes per warp, registers, predicate slots, register banks.
//! 2. **Instruction Constants:** Instruction size, field masks and shifts.
//! 3. **Scheduler Constants:** The out-of-range warp id used for scheduler bubbles.
//! 4. **Memory Constants:** Word size and special CSR indices.

/// Number of lanes (threads) in one warp.
pub const WARP_SIZE: usize = 32;

/// Number of general-purpose registers per thread.
pub const NUM_REGS: usize = 64;

/// Number of predicate slots per warp. Slot 0 is hardwired all-true.
pub const NUM_PREDS: usize = 32;

/// Number of register file banks; a warp lives in bank `warp % REG_BANKS`.
pub const REG_BANKS: usize = 2;

/// Warps per warp-group (one even, one odd).
pub const WARPS_PER_GROUP: usize = 2;

/// Size of one instruction word in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Size of one data word in bytes.
pub const WORD_SIZE: u32 = 4;

/// Warp id carried by scheduler bubbles; never a valid warp.
pub const SENTINEL_WARP: usize = 10_000;

/// CSR holding the global thread id (`warp * WARP_SIZE + lane`).
pub const CSR_THREAD_ID: u16 = 1000;

/// Number of addressable CSRs (10-bit index).
pub const NUM_CSRS: usize = 1024;

/// Bit mask for the 7-bit opcode field.
pub const OPCODE_MASK: u32 = 0x7F;

/// Bit mask for a 6-bit register or immediate field.
pub const FIELD6_MASK: u32 = 0x3F;

/// Bit mask for the 5-bit predicate field.
pub const PRED_MASK: u32 = 0x1F;

/// Bit mask for a 12-bit immediate.
pub const IMM12_MASK: u32 = 0xFFF;

/// Bit mask for a 10-bit CSR index.
pub const CSR_MASK: u32 = 0x3FF;

/// Bit position of the destination register field.
pub const RD_SHIFT: u32 = 7;

/// Bit position of the first source register field.
pub const RS1_SHIFT: u32 = 13;

/// Bit position of the second source register / 6-bit immediate field.
pub const RS2_SHIFT: u32 = 19;

/// Bit position of the guard predicate field.
pub const PRED_SHIFT: u32 = 25;

/// Bit marking a multi-op packet member (or packet start).
pub const MOP_BIT: u32 = 1 << 30;

/// Bit marking the end of a packet.
pub const EOP_BIT: u32 = 1 << 31;
