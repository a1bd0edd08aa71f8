//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer lane arithmetic used by the ALU, integer
//! multiply and integer divide units. It handles register and immediate forms,
//! the partial-immediate loads, float/int conversions and CSR moves.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, Div
//! - [`logic`]:      Or, And, Xor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra
//! - [`immediates`]: Auipc, Lli, Lmi, Lui

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Upper and partial immediate operations.
pub mod immediates;

/// Bitwise logical and comparison operations (or, and, xor, slt).
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use tracing::warn;

use super::fpu;
use crate::core::pipeline::latches::Instruction;
use crate::isa::op::{COp, FOp, IOp, ROp};
use crate::isa::Op;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug, Clone, Copy)]
pub struct Alu;

impl Alu {
    /// Computes one lane of an integer operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation.
    /// * `a` - `rs1` value.
    /// * `b` - `rs2` value.
    /// * `imm` - Decoded immediate.
    /// * `old` - Current `rd` value, for partial-immediate merges.
    /// * `pc` - Address of the instruction.
    ///
    /// # Returns
    ///
    /// The lane result, or `0` for operations this unit does not execute.
    ///
    /// # Examples
    ///
    /// ```
    /// use simt_core::core::units::alu::Alu;
    /// use simt_core::isa::Op;
    /// use simt_core::isa::op::{IOp, ROp, UOp};
    ///
    /// assert_eq!(Alu::lane(Op::R(ROp::Add), 40, 2, 0, 0, 0), 42);
    /// assert_eq!(Alu::lane(Op::I(IOp::Slli), 1, 0, 4, 0, 0), 0x10);
    /// assert_eq!(Alu::lane(Op::R(ROp::Div), 7, 0, 0, 0, 0), 0);
    /// assert_eq!(Alu::lane(Op::U(UOp::Lui), 0, 0, 0x20, 0, 0), 0x2000_0000);
    /// ```
    pub const fn lane(op: Op, a: u32, b: u32, imm: i32, old: u32, pc: u32) -> u32 {
        let imm = imm as u32;
        match op {
            Op::R(op @ (ROp::Add | ROp::Sub | ROp::Mul | ROp::Div)) => {
                arithmetic::execute(op, a, b)
            }
            Op::R(op @ (ROp::And | ROp::Or | ROp::Xor | ROp::Slt | ROp::Sltu)) => {
                logic::execute(op, a, b)
            }
            Op::R(op @ (ROp::Sll | ROp::Srl | ROp::Sra)) => shifts::execute(op, a, b),
            Op::I(IOp::Addi) => arithmetic::execute(ROp::Add, a, imm),
            Op::I(IOp::Subi) => arithmetic::execute(ROp::Sub, a, imm),
            Op::I(IOp::Xori) => logic::execute(ROp::Xor, a, imm),
            Op::I(IOp::Ori) => logic::execute(ROp::Or, a, imm),
            Op::I(IOp::Slti) => logic::execute(ROp::Slt, a, imm),
            Op::I(IOp::Sltiu) => logic::execute(ROp::Sltu, a, imm),
            Op::I(IOp::Slli) => shifts::execute(ROp::Sll, a, imm),
            Op::I(IOp::Srli) => shifts::execute(ROp::Srl, a, imm),
            Op::I(IOp::Srai) => shifts::execute(ROp::Sra, a, imm),
            Op::F(op @ (FOp::Itof | FOp::Ftoi)) => fpu::convert(op, a),
            Op::U(op) => immediates::execute(op, imm, old, pc),
            Op::C(COp::Csrw) => a,
            _ => 0,
        }
    }

    /// Executes an instruction on every active lane, filling `wdat`.
    ///
    /// `csrr` takes the CSR value read at issue. A zero divisor yields zero
    /// on that lane and is reported once per instruction.
    pub fn execute(inst: &mut Instruction) {
        let op = inst.decoded.op;
        let imm = inst.decoded.imm;
        let mut zero_divisors = 0;
        for lane in inst.predicate.iter() {
            let (a, b) = (inst.rs1_val[lane], inst.rs2_val[lane]);
            if matches!(op, Op::R(ROp::Div)) && b == 0 {
                zero_divisors += 1;
            }
            inst.wdat[lane] = match op {
                Op::C(COp::Csrr) => inst.csr_val[lane],
                _ => Self::lane(op, a, b, imm, inst.rd_val[lane], inst.pc),
            };
        }
        if zero_divisors > 0 {
            warn!(
                warp = inst.warp,
                pc = format_args!("{:#x}", inst.pc),
                lanes = zero_divisors,
                "integer divide by zero, result set to 0"
            );
        }
    }
}
