//! Issue Stage.
//!
//! Decoded instructions wait in a small in-order buffer per warp-group. Each
//! cycle the stage performs the following:
//! 1. **Dispatch:** Picks, round-robin over groups, the first buffer head whose
//!    registers are free in the scoreboard and whose unit can take it, reads
//!    its operands and sends it to that unit.
//! 2. **Accept:** Moves decode's output into its group buffer, leaving it in the
//!    latch when the buffer is full.
//! 3. **Report:** Sends the buffer-full bitmap to the scheduler.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::constants::WARP_SIZE;
use crate::config::Config;
use crate::core::arch::ArchState;
use crate::core::pipeline::latch::{ForwardingIf, Latch};
use crate::core::pipeline::latches::Instruction;
use crate::core::pipeline::scoreboard::Scoreboard;
use crate::core::pipeline::signals::IssueBitmap;
use crate::isa::Op;
use crate::isa::op::COp;
use crate::stats::SimStats;

/// Per-group instruction buffers.
#[derive(Clone, Debug)]
pub struct IssueStage {
    buffers: Vec<VecDeque<Instruction>>,
    depth: usize,
    next: usize,
}

impl IssueStage {
    /// Creates empty buffers for every warp-group.
    pub fn new(config: &Config) -> Self {
        let depth = config.issue.ibuffer_depth;
        Self {
            buffers: (0..config.group_count())
                .map(|_| VecDeque::with_capacity(depth))
                .collect(),
            depth,
            next: 0,
        }
    }

    /// Instructions buffered for `group`.
    pub fn buffered(&self, group: usize) -> usize {
        self.buffers[group].len()
    }

    /// Returns `true` when every buffer is empty.
    pub fn is_idle(&self) -> bool {
        self.buffers.iter().all(VecDeque::is_empty)
    }

    /// Executes the issue stage for one cycle.
    ///
    /// # Arguments
    ///
    /// * `input` - Decode output.
    /// * `dispatch` - One latch per unit, indexed by `FuKind::index`.
    /// * `link` - Buffer-full bitmap to the scheduler.
    /// * `scoreboard` - Pending register writes.
    /// * `arch` - Register, predicate and CSR state for operand reads.
    /// * `stats` - Counters.
    pub fn tick(
        &mut self,
        input: &mut Latch<Instruction>,
        dispatch: &mut [Latch<Instruction>],
        link: &mut ForwardingIf<IssueBitmap>,
        scoreboard: &mut Scoreboard,
        arch: &ArchState,
        stats: &mut SimStats,
    ) {
        self.dispatch(dispatch, scoreboard, arch, stats);

        if let Some(inst) = input.snoop()
            && self.buffers[inst.group].len() < self.depth
            && let Some(inst) = input.pop()
        {
            self.buffers[inst.group].push_back(inst);
        }

        link.force_push(IssueBitmap(
            self.buffers.iter().map(|b| b.len() >= self.depth).collect(),
        ));
    }

    fn dispatch(
        &mut self,
        dispatch: &mut [Latch<Instruction>],
        scoreboard: &mut Scoreboard,
        arch: &ArchState,
        stats: &mut SimStats,
    ) {
        let n = self.buffers.len();
        let mut held = false;
        let chosen = (0..n).map(|i| (self.next + i) % n).find(|&g| {
            let Some(head) = self.buffers[g].front() else {
                return false;
            };
            if !scoreboard.can_issue(head.warp, &head.decoded) {
                held = true;
                return false;
            }
            dispatch[head.unit.index()].ready_for_push()
        });
        if held {
            stats.scoreboard_stalls += 1;
        }
        let Some(g) = chosen else {
            return;
        };
        let Some(mut inst) = self.buffers[g].pop_front() else {
            return;
        };

        read_operands(&mut inst, arch);
        scoreboard.reserve(inst.warp, &inst.decoded);
        trace!(
            warp = inst.warp,
            pc = format_args!("{:#x}", inst.pc),
            unit = inst.unit.name(),
            "dispatch"
        );
        dispatch[inst.unit.index()].send(inst);
        self.next = (g + 1) % n;
        stats.dispatched += 1;
    }
}

/// Fills the operand buffers of `inst` from architectural state.
fn read_operands(inst: &mut Instruction, arch: &ArchState) {
    let (d, warp) = (inst.decoded, inst.warp);
    let read = |reg: Option<usize>| reg.map_or([0; WARP_SIZE], |r| arch.regs.read(warp, r));
    inst.rs1_val = read(d.rs1);
    inst.rs2_val = read(d.rs2);
    if d.reads_rd() {
        inst.rd_val = read(d.rd);
    }
    if matches!(d.op, Op::C(COp::Csrr)) {
        inst.csr_val = arch.csrs.read(warp, d.csr);
    }
}
