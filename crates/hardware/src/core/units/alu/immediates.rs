//! Upper and partial immediates.
//!
//! `lli`, `lmi` and `lui` each replace one field of the destination and keep
//! the rest, so a full 32-bit constant is built from up to three instructions:
//!
//! ```text
//! lui  rd, imm   ->  {imm[7:0],  rd[23:0]}
//! lmi  rd, imm   ->  {rd[31:24], imm[11:0], rd[11:0]}
//! lli  rd, imm   ->  {rd[31:12], imm[11:0]}
//! auipc rd, imm  ->  pc + (imm << 12)
//! ```

use crate::isa::op::UOp;

const IMM12_MASK: u32 = 0xFFF;

/// Executes a U-form operation on one lane.
///
/// # Arguments
///
/// * `op` - The operation.
/// * `imm` - Unsigned 12-bit immediate.
/// * `old` - Current destination value.
/// * `pc` - Address of the instruction.
pub const fn execute(op: UOp, imm: u32, old: u32, pc: u32) -> u32 {
    let imm = imm & IMM12_MASK;
    match op {
        UOp::Auipc => pc.wrapping_add(imm << 12),
        UOp::Lli => (old & 0xFFFF_F000) | imm,
        UOp::Lmi => (old & 0xFF00_0FFF) | (imm << 12),
        UOp::Lui => ((imm & 0xFF) << 24) | (old & 0x00FF_FFFF),
    }
}
