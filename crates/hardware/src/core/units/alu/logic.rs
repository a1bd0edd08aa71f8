//! ALU logical and comparison operations.
//!
//! Bitwise OR, AND, XOR, and set-less-than (signed and unsigned). Comparisons
//! return 0 or 1.

use crate::isa::op::ROp;

/// Executes a logical or comparison operation on one lane.
///
/// Returns `0` for non-logic opcodes.
pub const fn execute(op: ROp, a: u32, b: u32) -> u32 {
    match op {
        ROp::Or => a | b,
        ROp::And => a & b,
        ROp::Xor => a ^ b,
        ROp::Slt => ((a as i32) < (b as i32)) as u32,
        ROp::Sltu => (a < b) as u32,
        _ => 0,
    }
}
