//! Instruction Disassembler.
//!
//! Renders a [`Decoded`] instruction as assembly text for traces, logs and
//! test diagnostics, e.g. `blt p1, x1, x11 ;eop` or `sw x9, 0(x4) @p1`.

use std::fmt;

use super::instruction::{Decoded, InstructionBits};
use super::op::{COp, IOp, Op, POp};

/// Formats an optional register.
struct Reg(Option<usize>);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(r) => write!(f, "x{r}"),
            None => f.write_str("x?"),
        }
    }
}

/// Formats an optional predicate slot.
struct Pred(Option<usize>);

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "p{p}"),
            None => f.write_str("p?"),
        }
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.op.mnemonic();
        let (rd, rs1, rs2) = (Reg(self.rd), Reg(self.rs1), Reg(self.rs2));
        match self.op {
            Op::R(_) => write!(f, "{m} {rd}, {rs1}, {rs2}")?,
            Op::I(IOp::Lw | IOp::Lh | IOp::Lb | IOp::Jalr) => {
                write!(f, "{m} {rd}, {}({rs1})", self.imm)?;
            }
            Op::I(_) => write!(f, "{m} {rd}, {rs1}, {}", self.imm)?,
            Op::F(_) => write!(f, "{m} {rd}, {rs1}")?,
            Op::S(_) => write!(f, "{m} {rs2}, {}({rs1})", self.imm)?,
            Op::B(_) => write!(f, "{m} {}, {rs1}, {rs2}", Pred(self.dest_pred))?,
            Op::U(_) => write!(f, "{m} {rd}, {:#x}", self.imm)?,
            Op::C(COp::Csrr) => write!(f, "{m} {rd}, {}", self.csr)?,
            Op::C(COp::Csrw) => write!(f, "{m} {}, {rs1}", self.csr)?,
            Op::J(_) => write!(f, "{m} {rd}, {}", self.imm)?,
            Op::P(POp::Jpnz) => write!(f, "{m} {}, {}", Pred(self.pred_operand), self.imm)?,
            Op::P(POp::Prr) => write!(f, "{m} {rd}, {}", Pred(self.pred_operand))?,
            Op::P(POp::Prw) => write!(f, "{m} {}, {rs1}", Pred(self.dest_pred))?,
            Op::H(_) => f.write_str(m)?,
            Op::Nop => write!(f, "{m} ({:#010x})", self.raw)?,
        }
        if let Some(p) = self.src_pred.filter(|&p| p != 0) {
            write!(f, " @p{p}")?;
        }
        if self.raw.is_eop() {
            f.write_str(" ;eop")?;
        } else if self.raw.is_mop() {
            f.write_str(" ;mop")?;
        }
        Ok(())
    }
}
