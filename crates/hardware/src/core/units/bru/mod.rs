//! Branch Resolution Unit (BRU).
//!
//! There is no branch prediction in a SIMT warp: compares write a predicate
//! register instead of redirecting, and only the jumps change a warp-group's
//! PC. This unit resolves:
//! 1. **Compares (B form):** `dest_pred = guard & (rs1 <cmp> rs2)` per lane.
//! 2. **Jumps:** `jal` and `jalr` link `pc + 4` into `rd` and always redirect;
//!    `jalr` takes its target from the first active lane.
//! 3. **Predicate control:** `jpnz` redirects to `pc + imm` when any active
//!    lane of its predicate operand is set; `prr` and `prw` move a predicate
//!    to and from an integer register.

use crate::common::LaneMask;
use crate::core::pipeline::latches::Instruction;
use crate::isa::Op;
use crate::isa::op::{BOp, IOp, JOp, POp};

/// Branch Resolution Unit.
#[derive(Debug, Clone, Copy)]
pub struct Bru;

impl Bru {
    /// Evaluates a compare on one lane.
    pub const fn compare(op: BOp, a: u32, b: u32) -> bool {
        match op {
            BOp::Beq => a == b,
            BOp::Bne => a != b,
            BOp::Bge => (a as i32) >= (b as i32),
            BOp::Bgeu => a >= b,
            BOp::Blt => (a as i32) < (b as i32),
            BOp::Bltu => a < b,
        }
    }

    /// Executes a branch-unit instruction, filling `wdat`, `pred_result` and
    /// `redirect` as the operation requires.
    pub fn execute(inst: &mut Instruction) {
        let active = inst.predicate;
        let link = inst.pc.wrapping_add(4);
        let target = inst.pc.wrapping_add(inst.decoded.imm as u32);
        match inst.decoded.op {
            Op::B(op) => {
                let (a, b) = (&inst.rs1_val, &inst.rs2_val);
                inst.pred_result =
                    LaneMask::from_fn(|lane| active.get(lane) && Self::compare(op, a[lane], b[lane]));
            }
            Op::J(JOp::Jal) => {
                for lane in active.iter() {
                    inst.wdat[lane] = link;
                }
                inst.redirect = Some(target);
            }
            Op::I(IOp::Jalr) => {
                for lane in active.iter() {
                    inst.wdat[lane] = link;
                }
                inst.redirect = active
                    .first()
                    .map(|lane| inst.rs1_val[lane].wrapping_add(inst.decoded.imm as u32));
            }
            Op::P(POp::Jpnz) => {
                if (inst.pred_value & active).any() {
                    inst.redirect = Some(target);
                }
            }
            Op::P(POp::Prr) => {
                for lane in active.iter() {
                    inst.wdat[lane] = u32::from(inst.pred_value.get(lane));
                }
            }
            Op::P(POp::Prw) => {
                let a = &inst.rs1_val;
                inst.pred_result = LaneMask::from_fn(|lane| a[lane] != 0);
            }
            _ => {}
        }
    }
}
