//! Instruction encoding and field extraction.
//!
//! Every instruction is one 32-bit word:
//!
//! ```text
//!  31   30   29..25  24..19     18..13  12..7  6..0
//! EOP  MOP   pred   rs2/imm6    rs1     rd     opcode
//! ```
//!
//! U, J and P forms reuse bits 24-13 as a 12-bit immediate, and C forms use
//! bits 22-13 as the CSR index.

use crate::common::constants::{
    CSR_MASK, EOP_BIT, FIELD6_MASK, IMM12_MASK, MOP_BIT, OPCODE_MASK, PRED_MASK, PRED_SHIFT,
    RD_SHIFT, RS1_SHIFT, RS2_SHIFT,
};

use super::op::Op;

/// Sign-extends the low `bits` bits of `value`.
#[inline]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Opcode field (bits 6-0).
    fn opcode(&self) -> u32;

    /// Destination register field (bits 12-7).
    fn rd(&self) -> usize;

    /// First source register field (bits 18-13).
    fn rs1(&self) -> usize;

    /// Second source register field (bits 24-19).
    fn rs2(&self) -> usize;

    /// Bits 24-19 as a signed 6-bit immediate.
    fn imm6(&self) -> i32;

    /// Bits 24-13 as an unsigned 12-bit immediate.
    fn imm12(&self) -> u32;

    /// Guard predicate field (bits 29-25).
    fn pred(&self) -> usize;

    /// CSR index (bits 22-13).
    fn csr(&self) -> u16;

    /// Multi-op / packet-start marker (bit 30).
    fn is_mop(&self) -> bool;

    /// End-of-packet marker (bit 31).
    fn is_eop(&self) -> bool;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & FIELD6_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & FIELD6_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> RS2_SHIFT) & FIELD6_MASK) as usize
    }

    #[inline(always)]
    fn imm6(&self) -> i32 {
        sign_extend((self >> RS2_SHIFT) & FIELD6_MASK, 6)
    }

    #[inline(always)]
    fn imm12(&self) -> u32 {
        (self >> RS1_SHIFT) & IMM12_MASK
    }

    #[inline(always)]
    fn pred(&self) -> usize {
        ((self >> PRED_SHIFT) & PRED_MASK) as usize
    }

    #[inline(always)]
    fn csr(&self) -> u16 {
        ((self >> RS1_SHIFT) & CSR_MASK) as u16
    }

    #[inline(always)]
    fn is_mop(&self) -> bool {
        self & MOP_BIT != 0
    }

    #[inline(always)]
    fn is_eop(&self) -> bool {
        self & EOP_BIT != 0
    }
}

/// A decoded instruction: operation plus the operand fields its format uses.
///
/// Fields a format does not use are `None` (or zero for `imm`/`csr`), so
/// later stages never read a register the instruction does not name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Raw instruction bits.
    pub raw: u32,
    /// Operation.
    pub op: Op,
    /// Destination register.
    pub rd: Option<usize>,
    /// First source register (base address for memory operations).
    pub rs1: Option<usize>,
    /// Second source register (store data for stores).
    pub rs2: Option<usize>,
    /// Immediate, sign- or zero-extended per format.
    pub imm: i32,
    /// Guard predicate slot; `None` executes on every lane.
    pub src_pred: Option<usize>,
    /// Predicate slot written by compares and `prw`.
    pub dest_pred: Option<usize>,
    /// Predicate slot read as a value by `prr` and `jpnz`.
    pub pred_operand: Option<usize>,
    /// CSR index for C forms.
    pub csr: u16,
}

impl Decoded {
    /// Returns `true` if the instruction reads `rd` as an input
    /// (the partial-immediate forms merge into the old value).
    pub const fn reads_rd(&self) -> bool {
        matches!(
            self.op,
            Op::U(super::op::UOp::Lli | super::op::UOp::Lmi | super::op::UOp::Lui)
        )
    }

    /// Registers read by this instruction.
    pub fn sources(&self) -> impl Iterator<Item = usize> {
        let rd = if self.reads_rd() { self.rd } else { None };
        [self.rs1, self.rs2, rd].into_iter().flatten()
    }
}
