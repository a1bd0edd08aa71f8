//! Execute Stage.
//!
//! Holds one pipelined unit per arithmetic class plus the load/store unit.
//! Each cycle every unit advances, branch results that reach a unit output
//! report their redirect to the scheduler, and each unit takes at most one
//! instruction from its dispatch latch.

use tracing::debug;

use crate::common::MemoryError;
use crate::config::{Config, ExecuteConfig};
use crate::core::pipeline::latch::{ForwardingIf, Latch};
use crate::core::pipeline::latches::Instruction;
use crate::core::pipeline::signals::BranchSignal;
use crate::core::units::cache::{DataRequest, DataResponse};
use crate::core::units::{FunctionalUnit, LoadStoreUnit};
use crate::isa::FuKind;
use crate::stats::SimStats;

/// Pipeline depth configured for `kind`.
const fn latency(kind: FuKind, config: &ExecuteConfig) -> usize {
    match kind {
        FuKind::Alu | FuKind::LoadStore => config.alu,
        FuKind::IntMul => config.mul,
        FuKind::IntDiv => config.div,
        FuKind::FpAddSub => config.fadd,
        FuKind::FpMul => config.fmul,
        FuKind::FpDiv => config.fdiv,
        FuKind::InvSqrt => config.isqrt,
        FuKind::Trig => config.trig,
        FuKind::Branch => config.branch,
    }
}

/// All execution resources of the core.
#[derive(Clone, Debug)]
pub struct ExecuteStage {
    units: Vec<FunctionalUnit>,
    /// Load/store unit.
    pub lsu: LoadStoreUnit,
}

impl ExecuteStage {
    /// Builds every unit from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            units: FuKind::PIPELINED
                .into_iter()
                .map(|kind| {
                    FunctionalUnit::new(
                        kind,
                        latency(kind, &config.execute),
                        config.execute.out_buffer,
                    )
                })
                .collect(),
            lsu: LoadStoreUnit::new(config),
        }
    }

    /// Pipelined units in `FuKind::index` order.
    pub fn units(&self) -> &[FunctionalUnit] {
        &self.units
    }

    /// Mutable access to the pipelined units, for writeback.
    pub fn units_mut(&mut self) -> &mut [FunctionalUnit] {
        &mut self.units
    }

    /// Returns `true` when no unit holds an instruction.
    pub fn is_idle(&self) -> bool {
        self.units.iter().all(FunctionalUnit::is_idle) && self.lsu.is_idle()
    }

    /// Executes one cycle.
    ///
    /// # Arguments
    ///
    /// * `dispatch` - Dispatch latches from issue, indexed by `FuKind::index`.
    /// * `lsu_req` - Load/store unit requests to the data cache.
    /// * `lsu_resp` - Data cache answers to the load/store unit.
    /// * `branch` - Redirect link to the scheduler.
    /// * `stats` - Counters.
    ///
    /// # Errors
    ///
    /// Propagates address-map violations from the load/store unit.
    pub fn tick(
        &mut self,
        dispatch: &mut [Latch<Instruction>],
        lsu_req: &mut Latch<DataRequest>,
        lsu_resp: &mut Latch<DataResponse>,
        branch: &mut ForwardingIf<BranchSignal>,
        stats: &mut SimStats,
    ) -> Result<(), MemoryError> {
        for unit in &mut self.units {
            let idx = unit.kind().index();
            if let Some(done) = unit.tick()
                && let Some(dest) = done.redirect
            {
                debug!(group = done.group, pc = format_args!("{:#x}", done.pc), dest = format_args!("{dest:#x}"), "branch resolved");
                branch.send(BranchSignal {
                    group: done.group,
                    dest,
                });
            }

            if unit.can_accept()
                && let Some(inst) = dispatch[idx].pop()
            {
                if let Err(inst) = unit.accept(inst) {
                    dispatch[idx].send(inst);
                } else {
                    stats.unit_ops[idx] += 1;
                }
            }
        }

        self.lsu
            .tick(&mut dispatch[FuKind::LoadStore.index()], lsu_req, lsu_resp, stats)
    }
}
