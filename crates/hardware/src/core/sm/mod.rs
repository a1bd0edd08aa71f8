//! Streaming Multiprocessor Definition.
//!
//! This module defines the `Sm` structure, the container for one SIMT core
//! and the memory behind it. It coordinates the following:
//! 1. **State Management:** Registers, predicates and CSRs of every warp.
//! 2. **Pipeline Control:** Scheduler, stages and the latches between them.
//! 3. **Memory Hierarchy:** Both L1 caches, the arbiter, the controller and the demux.
//! 4. **Feedback:** The sideband links that steer the scheduler.

/// Per-cycle stage sequencing.
pub mod execution;

use crate::config::Config;
use crate::core::arch::ArchState;
use crate::core::pipeline::latch::Latch;
use crate::core::pipeline::latches::{FetchEntry, FetchedEntry, Instruction};
use crate::core::pipeline::scheduler::WarpScheduler;
use crate::core::pipeline::scoreboard::Scoreboard;
use crate::core::pipeline::signals::FeedbackLinks;
use crate::core::pipeline::stages::{DecodeStage, ExecuteStage, IssueStage, WritebackStage};
use crate::core::units::cache::{DataCache, DataRequest, DataResponse, InstructionCache};
use crate::isa::FuKind;
use crate::soc::interconnect::{MemRequest, MemResponse, TaggedRequest};
use crate::soc::{MemArbiter, MemController, MemRespDemux, Memory};
use crate::stats::SimStats;

/// One SIMT core with its private caches and the shared memory controller.
#[derive(Debug)]
pub struct Sm {
    /// Registers, predicates and CSRs.
    pub arch: ArchState,
    /// Pending register writes.
    pub scoreboard: Scoreboard,

    /// Warp scheduler.
    pub scheduler: WarpScheduler,
    /// L1 instruction cache.
    pub icache: InstructionCache,
    /// Decode stage.
    pub decode: DecodeStage,
    /// Issue stage.
    pub issue: IssueStage,
    /// Functional units and the load/store unit.
    pub execute: ExecuteStage,
    /// L1 data cache.
    pub dcache: DataCache,
    /// Writeback stage.
    pub writeback: WritebackStage,

    /// Memory request arbiter.
    pub arbiter: MemArbiter,
    /// Memory controller.
    pub controller: MemController,
    /// Response demux.
    pub demux: MemRespDemux,
    /// Backing store.
    pub memory: Memory,

    /// Scheduler → instruction cache.
    pub fetch: Latch<FetchEntry>,
    /// Instruction cache → decode.
    pub fetched: Latch<FetchedEntry>,
    /// Decode → issue.
    pub decoded: Latch<Instruction>,
    /// Issue → each unit, indexed by `FuKind::index`.
    pub dispatch: Vec<Latch<Instruction>>,
    /// Load/store unit → data cache.
    pub lsu_req: Latch<DataRequest>,
    /// Data cache → load/store unit.
    pub lsu_resp: Latch<DataResponse>,
    /// Instruction cache → arbiter.
    pub ic_mem_req: Latch<MemRequest>,
    /// Data cache → arbiter.
    pub dc_mem_req: Latch<MemRequest>,
    /// Arbiter → controller.
    pub mem_req: Latch<TaggedRequest>,
    /// Controller → demux.
    pub mem_resp: Latch<MemResponse>,
    /// Demux → instruction cache.
    pub ic_mem_resp: Latch<MemResponse>,
    /// Demux → data cache.
    pub dc_mem_resp: Latch<MemResponse>,

    /// Sideband links into the scheduler.
    pub links: FeedbackLinks,
    /// Performance counters.
    pub stats: SimStats,
    /// Emit a per-cycle snapshot at `debug` level.
    pub trace: bool,
}

impl Sm {
    /// Builds an idle core with zeroed state and empty memory.
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration.
    pub fn new(config: &Config) -> Self {
        let warp_count = config.general.warp_count;
        Self {
            arch: ArchState::new(warp_count),
            scoreboard: Scoreboard::new(warp_count),

            scheduler: WarpScheduler::new(config),
            icache: InstructionCache::new(&config.icache),
            decode: DecodeStage::new(config),
            issue: IssueStage::new(config),
            execute: ExecuteStage::new(config),
            dcache: DataCache::new(&config.dcache),
            writeback: WritebackStage::new(),

            arbiter: MemArbiter::new(config.memory.arbiter),
            controller: MemController::new(config.memory.latency),
            demux: MemRespDemux::new(),
            memory: Memory::new(),

            fetch: Latch::new("fetch"),
            fetched: Latch::new("fetched"),
            decoded: Latch::new("decoded"),
            dispatch: FuKind::PIPELINED
                .into_iter()
                .chain([FuKind::LoadStore])
                .map(|kind| Latch::new(kind.name()))
                .collect(),
            lsu_req: Latch::new("lsu_req"),
            lsu_resp: Latch::new("lsu_resp"),
            ic_mem_req: Latch::new("ic_mem_req"),
            dc_mem_req: Latch::new("dc_mem_req"),
            mem_req: Latch::new("mem_req"),
            mem_resp: Latch::new("mem_resp"),
            ic_mem_resp: Latch::new("ic_mem_resp"),
            dc_mem_resp: Latch::new("dc_mem_resp"),

            links: FeedbackLinks::default(),
            stats: SimStats::default(),
            trace: config.general.trace,
        }
    }

    /// Returns `true` when every group has halted and nothing is left in flight
    /// anywhere in the pipeline or the memory hierarchy.
    pub fn is_done(&self) -> bool {
        self.scheduler.all_halted()
            && self.latches_empty()
            && self.issue.is_idle()
            && self.execute.is_idle()
            && self.icache.is_idle()
            && self.dcache.is_idle()
            && self.controller.is_idle()
            && self.scoreboard.is_idle()
    }

    fn latches_empty(&self) -> bool {
        !(self.fetch.is_valid()
            || self.fetched.is_valid()
            || self.decoded.is_valid()
            || self.dispatch.iter().any(Latch::is_valid)
            || self.lsu_req.is_valid()
            || self.lsu_resp.is_valid()
            || self.ic_mem_req.is_valid()
            || self.dc_mem_req.is_valid()
            || self.mem_req.is_valid()
            || self.mem_resp.is_valid()
            || self.ic_mem_resp.is_valid()
            || self.dc_mem_resp.is_valid())
    }
}
