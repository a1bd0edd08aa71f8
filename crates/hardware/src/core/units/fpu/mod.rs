//! Floating-Point Unit (FPU).
//!
//! Single-precision lane arithmetic for the float add/sub, float multiply,
//! float divide, inverse square root and trig units. Registers hold raw
//! IEEE 754 bits; every operation reinterprets its inputs with
//! `f32::from_bits` and stores the result with `to_bits`.
//!
//! Edge cases follow IEEE 754 with two defined exceptions, both reported:
//! 1. **Divide by zero:** Signed infinity (NaN for `0/0`).
//! 2. **Inverse square root of x ≤ 0:** Positive infinity.

use tracing::warn;

use crate::core::pipeline::latches::Instruction;
use crate::isa::Op;
use crate::isa::op::{FOp, ROp};

/// Floating-Point Unit (FPU) for single-precision operations.
#[derive(Debug, Clone, Copy)]
pub struct Fpu;

/// Integer/float conversions, executed by the ALU.
///
/// `itof` converts a signed integer; `ftoi` truncates toward zero and
/// saturates, with NaN converting to zero.
pub const fn convert(op: FOp, a: u32) -> u32 {
    match op {
        FOp::Itof => (a as i32 as f32).to_bits(),
        FOp::Ftoi => f32::from_bits(a) as i32 as u32,
        _ => 0,
    }
}

impl Fpu {
    /// Computes one lane of a float operation.
    ///
    /// # Returns
    ///
    /// The result bits and whether the lane hit a reported edge case.
    pub fn lane(op: Op, a: u32, b: u32) -> (u32, bool) {
        let (x, y) = (f32::from_bits(a), f32::from_bits(b));
        let (r, edge) = match op {
            Op::R(ROp::Addf) => (x + y, false),
            Op::R(ROp::Subf) => (x - y, false),
            Op::R(ROp::Mulf) => (x * y, false),
            Op::R(ROp::Divf) => (x / y, y == 0.0),
            Op::F(FOp::Isqrt) if x <= 0.0 => (f32::INFINITY, true),
            Op::F(FOp::Isqrt) => (x.sqrt().recip(), false),
            Op::F(FOp::Sin) => (x.sin(), false),
            Op::F(FOp::Cos) => (x.cos(), false),
            _ => (0.0, false),
        };
        (r.to_bits(), edge)
    }

    /// Executes an instruction on every active lane, filling `wdat`.
    pub fn execute(inst: &mut Instruction) {
        let op = inst.decoded.op;
        let mut edges = 0;
        for lane in inst.predicate.iter() {
            let (bits, edge) = Self::lane(op, inst.rs1_val[lane], inst.rs2_val[lane]);
            inst.wdat[lane] = bits;
            edges += u32::from(edge);
        }
        if edges > 0 {
            warn!(
                warp = inst.warp,
                pc = format_args!("{:#x}", inst.pc),
                op = %op,
                lanes = edges,
                "float divide by zero or inverse square root of x <= 0"
            );
        }
    }
}
