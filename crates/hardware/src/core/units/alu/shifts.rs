//! ALU shift operations.
//!
//! Shift amounts are masked to 5 bits (0-31).

use crate::isa::op::ROp;

/// Bit mask for the shift amount.
const SHAMT_MASK: u32 = 0x1f;

/// Executes a shift on one lane.
///
/// # Arguments
///
/// * `op` - Must be `Sll`, `Srl` or `Sra`.
/// * `a` - The value to be shifted.
/// * `b` - The shift amount; only the low five bits are used.
///
/// # Returns
///
/// The shifted value. Returns `0` for non-shift opcodes.
pub const fn execute(op: ROp, a: u32, b: u32) -> u32 {
    let sh = b & SHAMT_MASK;
    match op {
        ROp::Sll => a << sh,
        ROp::Srl => a >> sh,
        ROp::Sra => ((a as i32) >> sh) as u32,
        _ => 0,
    }
}
