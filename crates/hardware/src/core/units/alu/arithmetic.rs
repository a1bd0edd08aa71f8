//! ALU arithmetic operations.
//!
//! Integer add, subtract, multiply and divide on 32-bit lanes. Add, subtract
//! and multiply wrap. Divide is signed and wraps on `i32::MIN / -1`; a zero
//! divisor yields zero, and the caller reports it.

use crate::isa::op::ROp;

/// Executes an integer arithmetic operation on one lane.
///
/// # Arguments
///
/// * `op` - Must be `Add`, `Sub`, `Mul` or `Div`.
/// * `a` - First operand.
/// * `b` - Second operand.
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-arithmetic opcodes.
pub const fn execute(op: ROp, a: u32, b: u32) -> u32 {
    match op {
        ROp::Add => a.wrapping_add(b),
        ROp::Sub => a.wrapping_sub(b),
        ROp::Mul => a.wrapping_mul(b),
        ROp::Div => {
            if b == 0 {
                0
            } else {
                (a as i32).wrapping_div(b as i32) as u32
            }
        }
        _ => 0,
    }
}
