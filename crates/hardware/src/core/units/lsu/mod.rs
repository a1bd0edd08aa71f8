//! Load/Store Unit (LSU).
//!
//! Memory instructions wait in a bounded queue while their lanes are served
//! by the data cache. The unit works the queue one cache request at a time:
//! 1. **Validation:** On entry every active lane address is checked against
//!    the address map. MMIO and tolerated out-of-range lanes finish locally
//!    (loads read zero, stores are dropped); violations abort the run.
//! 2. **Requests:** The oldest entry with a lane that is neither finished nor
//!    parked issues next. A load may go ahead of older loads but never ahead
//!    of an unfinished store; a store issues only once every older entry is
//!    finished.
//! 3. **Responses:** See [`DataResponse`]. Miss completions wake parked lanes
//!    of every entry in the queue.
//! 4. **Retire:** Finished entries leave in order into a write-back buffer
//!    that writeback drains.
//!
//! - [`coalesce`]: Lane bookkeeping for one queued instruction.

/// Per-instruction lane tracking.
pub mod coalesce;

use std::collections::VecDeque;

use tracing::trace;

use self::coalesce::LsuEntry;
use super::cache::dcache::{DataRequest, DataResponse};
use crate::common::constants::{WARP_SIZE, WORD_SIZE};
use crate::common::{LaneMask, MemoryError};
use crate::config::Config;
use crate::core::pipeline::latch::Latch;
use crate::core::pipeline::latches::Instruction;
use crate::isa::op::{IOp, SOp};
use crate::isa::{FuKind, Op};
use crate::soc::memory::{AccessPolicy, Route};
use crate::stats::SimStats;

/// Access width in bytes and store flag of a memory operation.
pub const fn access_of(op: Op) -> Option<(u32, bool)> {
    match op {
        Op::I(IOp::Lw) => Some((4, false)),
        Op::I(IOp::Lh) => Some((2, false)),
        Op::I(IOp::Lb) => Some((1, false)),
        Op::S(SOp::Sw) => Some((4, true)),
        Op::S(SOp::Sh) => Some((2, true)),
        Op::S(SOp::Sb) => Some((1, true)),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug)]
struct Outstanding {
    id: u64,
    lane: usize,
}

/// Load/Store Unit (LSU) for warp-wide memory instructions.
#[derive(Clone, Debug)]
pub struct LoadStoreUnit {
    queue: VecDeque<LsuEntry>,
    queue_size: usize,
    wb: VecDeque<Instruction>,
    wb_size: usize,
    block_bytes: u32,
    policy: AccessPolicy,
    outstanding: Option<Outstanding>,
    next_id: u64,
}

impl LoadStoreUnit {
    /// Creates an empty unit.
    pub fn new(config: &Config) -> Self {
        Self {
            queue: VecDeque::with_capacity(config.lsu.queue_size),
            queue_size: config.lsu.queue_size.max(1),
            wb: VecDeque::with_capacity(config.lsu.wb_buffer_size),
            wb_size: config.lsu.wb_buffer_size.max(1),
            block_bytes: config.dcache.block_bytes as u32,
            policy: AccessPolicy::from(&config.memory),
            outstanding: None,
            next_id: 0,
        }
    }

    /// Entries in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` when the queue, the write-back buffer and the cache
    /// port are all empty.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.wb.is_empty() && self.outstanding.is_none()
    }

    /// Oldest instruction ready for writeback.
    pub fn peek_wb(&self) -> Option<&Instruction> {
        self.wb.front()
    }

    /// Removes the oldest instruction ready for writeback.
    pub fn pop_wb(&mut self) -> Option<Instruction> {
        self.wb.pop_front()
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `dispatch` - Issue's dispatch latch for this unit.
    /// * `req` - Request latch to the data cache.
    /// * `resp` - Response latch from the data cache.
    /// * `stats` - Counters.
    ///
    /// # Errors
    ///
    /// Returns the first lane address that violates the address map.
    pub fn tick(
        &mut self,
        dispatch: &mut Latch<Instruction>,
        req: &mut Latch<DataRequest>,
        resp: &mut Latch<DataResponse>,
        stats: &mut SimStats,
    ) -> Result<(), MemoryError> {
        if let Some(response) = resp.pop() {
            self.respond(response);
        }

        if let Some(head) = self.queue.front()
            && head.is_complete()
            && self.wb.len() < self.wb_size
            && let Some(entry) = self.queue.pop_front()
        {
            trace!(warp = entry.inst.warp, pc = format_args!("{:#x}", entry.inst.pc), "lsu retire");
            self.wb.push_back(entry.inst);
        }

        if self.outstanding.is_none() && req.ready_for_push() {
            self.issue(req);
        }

        if dispatch.is_valid() {
            if self.queue.len() >= self.queue_size {
                stats.lsu_backpressure += 1;
            } else if let Some(inst) = dispatch.pop() {
                stats.unit_ops[FuKind::LoadStore.index()] += 1;
                let entry = self.admit(inst)?;
                self.queue.push_back(entry);
            }
        }
        Ok(())
    }

    /// Builds a queue entry, resolving lanes that never reach the cache.
    fn admit(&mut self, inst: Instruction) -> Result<LsuEntry, MemoryError> {
        let id = self.next_id;
        self.next_id += 1;
        let access = access_of(inst.decoded.op);
        let (size, store) = access.unwrap_or((WORD_SIZE, false));
        let mut entry = LsuEntry {
            id,
            addrs: [0; WARP_SIZE],
            size,
            store,
            finished: LaneMask::NONE,
            waiting: LaneMask::NONE,
            inst,
        };
        if access.is_none() {
            // halt
            entry.finished = LaneMask::ALL;
            return Ok(entry);
        }
        let imm = entry.inst.decoded.imm as u32;
        for lane in entry.inst.predicate.iter() {
            let addr = entry.inst.rs1_val[lane].wrapping_add(imm);
            entry.addrs[lane] = addr;
            match self.policy.check(addr, size, store)? {
                Route::Memory(_) => {}
                Route::Mmio | Route::Discard => entry.finish(lane, 0),
            }
        }
        Ok(entry)
    }

    /// Sends the next lane request, honouring memory ordering.
    fn issue(&mut self, req: &mut Latch<DataRequest>) {
        let mut older_unfinished = false;
        let mut older_store = false;
        for entry in &self.queue {
            if let Some(lane) = entry.pending().first() {
                let allowed = if entry.store { !older_unfinished } else { !older_store };
                if allowed {
                    let addr = entry.addrs[lane];
                    req.send(DataRequest {
                        addr,
                        size: entry.size,
                        store: entry.store.then(|| entry.inst.rs2_val[lane]),
                    });
                    self.outstanding = Some(Outstanding { id: entry.id, lane });
                    return;
                }
            }
            if !entry.is_complete() {
                older_unfinished = true;
                older_store |= entry.store;
            }
        }
    }

    /// Applies a data cache response.
    fn respond(&mut self, response: DataResponse) {
        let block_bytes = self.block_bytes;
        match response {
            DataResponse::HitStall => {}
            DataResponse::MissComplete { block } => {
                for entry in &mut self.queue {
                    entry.wake(block, block_bytes);
                }
            }
            DataResponse::MissAccepted { addr } => {
                if let Some((entry, lane)) = self.take_outstanding() {
                    if entry.store {
                        entry.finish(lane, 0);
                    } else {
                        entry.park(addr - addr % block_bytes, block_bytes);
                    }
                }
            }
            DataResponse::HitComplete { addr, word } => {
                if let Some((entry, lane)) = self.take_outstanding() {
                    if entry.store {
                        entry.finish(lane, 0);
                    } else {
                        entry.complete_word(addr, word);
                    }
                }
            }
        }
    }

    /// Clears the outstanding request and returns its entry and lane.
    fn take_outstanding(&mut self) -> Option<(&mut LsuEntry, usize)> {
        let Outstanding { id, lane } = self.outstanding.take()?;
        self.queue
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| (entry, lane))
    }
}
