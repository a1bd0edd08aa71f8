//! Writeback Stage.
//!
//! Retires one instruction per cycle, taken round-robin from the unit output
//! buffers and the load/store write-back buffer. Retirement commits the
//! active lanes to the register, predicate and CSR files, frees the
//! destination in the scoreboard and tells the scheduler.

use tracing::trace;

use crate::core::arch::ArchState;
use crate::core::pipeline::latch::ForwardingIf;
use crate::core::pipeline::latches::Instruction;
use crate::core::pipeline::scoreboard::Scoreboard;
use crate::core::pipeline::signals::WritebackSignal;
use crate::isa::Op;
use crate::isa::op::{COp, POp};
use crate::stats::{SimStats, UNIT_COUNT};

use super::execute::ExecuteStage;

/// Round-robin retire pointer over the unit outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct WritebackStage {
    next: usize,
}

impl WritebackStage {
    /// Creates the stage.
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Executes one cycle.
    ///
    /// # Arguments
    ///
    /// * `execute` - Source of finished instructions.
    /// * `arch` - Architectural state to commit into.
    /// * `scoreboard` - Cleared for the retired destination.
    /// * `link` - Completion signal to the scheduler.
    /// * `stats` - Counters.
    pub fn tick(
        &mut self,
        execute: &mut ExecuteStage,
        arch: &mut ArchState,
        scoreboard: &mut Scoreboard,
        link: &mut ForwardingIf<WritebackSignal>,
        stats: &mut SimStats,
    ) {
        let lsu_slot = UNIT_COUNT - 1;
        let has_output = |execute: &ExecuteStage, src: usize| {
            if src == lsu_slot {
                execute.lsu.peek_wb().is_some()
            } else {
                execute.units()[src].peek_out().is_some()
            }
        };
        let Some(src) = (0..UNIT_COUNT)
            .map(|i| (self.next + i) % UNIT_COUNT)
            .find(|&src| has_output(execute, src))
        else {
            return;
        };
        let popped = if src == lsu_slot {
            execute.lsu.pop_wb()
        } else {
            execute.units_mut()[src].pop_out()
        };
        let Some(inst) = popped else {
            return;
        };
        self.next = (src + 1) % UNIT_COUNT;

        commit(&inst, arch);
        scoreboard.release(inst.warp, &inst.decoded);
        link.send(WritebackSignal { group: inst.group });
        stats.instructions_retired += 1;
        stats.lanes_retired += u64::from(inst.predicate.count());
        trace!(
            warp = inst.warp,
            pc = format_args!("{:#x}", inst.pc),
            op = %inst.decoded.op,
            lanes = inst.predicate.count(),
            "retire"
        );
    }
}

/// Writes the results of `inst` into architectural state.
///
/// Compares overwrite their whole destination predicate, so lanes the guard
/// disabled read false afterwards; `prw` only touches active lanes.
fn commit(inst: &Instruction, arch: &mut ArchState) {
    let d = &inst.decoded;
    match d.op {
        Op::B(_) => {
            if let Some(slot) = d.dest_pred {
                arch.preds.write(inst.warp, slot, inst.pred_result);
            }
        }
        Op::P(POp::Prw) => {
            if let Some(slot) = d.dest_pred {
                arch.preds
                    .write_lanes(inst.warp, slot, inst.pred_result, inst.predicate);
            }
        }
        Op::C(COp::Csrw) => arch.csrs.write(inst.warp, d.csr, &inst.wdat, inst.predicate),
        _ => {}
    }
    if let Some(rd) = d.rd {
        arch.regs.write(inst.warp, rd, &inst.wdat, inst.predicate);
    }
}
