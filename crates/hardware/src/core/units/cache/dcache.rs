//! Banked lockup-free data cache.
//!
//! Addresses split as `[tag | set | bank | offset]`, so consecutive blocks land
//! in consecutive banks. The cache is write-back and write-allocate. Each cycle
//! it answers at most one message to the load/store unit:
//! 1. **Fill:** A block returning from memory is installed, any stores merged
//!    on the miss are applied, and `MissComplete` is sent. The bank is busy
//!    for the following cycle.
//! 2. **Request:** Otherwise the unit's pending request is looked at. A busy
//!    bank or a full MSHR answers `HitStall` and leaves the request in its
//!    latch; a hit answers `HitComplete`; a miss allocates or merges and
//!    answers `MissAccepted`.
//!
//! Dirty victims and block reads share one FIFO toward the arbiter, so a
//! write-back always reaches memory before a later read of the same block.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::mshr::{MissKind, Table};
use super::{Geometry, TagArray};
use crate::common::constants::WORD_SIZE;
use crate::config::DataCacheConfig;
use crate::core::pipeline::latch::Latch;
use crate::soc::interconnect::{MemReply, MemRequest, MemResponse};
use crate::soc::memory::Memory;
use crate::stats::SimStats;

/// One lane access presented by the load/store unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataRequest {
    /// Byte address, aligned to `size`.
    pub addr: u32,
    /// Access width in bytes (1, 2 or 4).
    pub size: u32,
    /// Store data (low `size` bytes), or `None` for a load.
    pub store: Option<u32>,
}

/// Cache answer to the load/store unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataResponse {
    /// The request hit; loads receive the whole word containing `addr`.
    HitComplete {
        /// Address of the request.
        addr: u32,
        /// Word containing `addr`.
        word: u32,
    },
    /// The request missed and was recorded; it has left the request latch.
    MissAccepted {
        /// Address of the request.
        addr: u32,
    },
    /// A block has been filled; lanes waiting on it may retry.
    MissComplete {
        /// Block base address.
        block: u32,
    },
    /// The request could not be handled this cycle and stays in its latch.
    HitStall,
}

/// A store recorded in the MSHR, applied when the block arrives.
#[derive(Clone, Copy, Debug)]
struct MergedStore {
    addr: u32,
    size: u32,
    value: u32,
}

/// Merges the low `size` bytes of `value` into `word` at the offset of `addr`.
pub const fn merge_bytes(word: u32, addr: u32, size: u32, value: u32) -> u32 {
    let shift = (addr % WORD_SIZE) * 8;
    let mask = if size >= WORD_SIZE {
        u32::MAX
    } else {
        ((1 << (size * 8)) - 1) << shift
    };
    (word & !mask) | ((value << shift) & mask)
}

/// Banked, write-back, write-allocate L1 data cache.
#[derive(Clone, Debug)]
pub struct DataCache {
    geometry: Geometry,
    banks: Vec<TagArray>,
    mshr: Table<Option<MergedStore>>,
    requests: VecDeque<MemRequest>,
    busy_bank: Option<usize>,
}

impl DataCache {
    /// Builds an empty cache from a validated configuration.
    pub fn new(config: &DataCacheConfig) -> Self {
        let sets_per_bank = config.sets() / config.banks;
        let geometry = Geometry {
            block_bytes: config.block_bytes as u32,
            banks: config.banks as u32,
            sets: sets_per_bank as u32,
            ways: config.ways,
        };
        Self {
            geometry,
            banks: (0..config.banks)
                .map(|_| TagArray::new(sets_per_bank, config.ways, geometry.words()))
                .collect(),
            mshr: Table::new(config.mshr_entries, config.mshr_max_merge),
            requests: VecDeque::new(),
            busy_bank: None,
        }
    }

    /// Address split used by this cache.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of blocks with an outstanding fill.
    pub fn outstanding_misses(&self) -> usize {
        self.mshr.len()
    }

    /// Returns `true` when no miss or memory request is pending.
    pub fn is_idle(&self) -> bool {
        self.mshr.is_empty() && self.requests.is_empty()
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `lsu_req` - Request latch written by the load/store unit; popped only
    ///   when the request is served or recorded.
    /// * `lsu_resp` - Response latch read by the load/store unit.
    /// * `mem_req` - Request latch read by the arbiter.
    /// * `mem_resp` - Response latch written by the demux.
    /// * `stats` - Counters.
    pub fn tick(
        &mut self,
        lsu_req: &mut Latch<DataRequest>,
        lsu_resp: &mut Latch<DataResponse>,
        mem_req: &mut Latch<MemRequest>,
        mem_resp: &mut Latch<MemResponse>,
        stats: &mut SimStats,
    ) {
        let busy = self.busy_bank.take();

        if lsu_resp.ready_for_push()
            && let Some(resp) = mem_resp.pop()
            && let Some(block) = self.fill(resp, stats)
        {
            lsu_resp.send(DataResponse::MissComplete { block });
        }

        if lsu_resp.ready_for_push()
            && let Some(&req) = lsu_req.snoop()
        {
            let resp = self.access(req, busy, stats);
            if !matches!(resp, DataResponse::HitStall) {
                let _ = lsu_req.pop();
            }
            lsu_resp.send(resp);
        }

        if mem_req.ready_for_push()
            && let Some(req) = self.requests.pop_front()
        {
            mem_req.send(req);
        }
        self.mshr.tick();
    }

    /// Looks up one lane access.
    fn access(&mut self, req: DataRequest, busy: Option<usize>, stats: &mut SimStats) -> DataResponse {
        let geometry = self.geometry;
        let bank = geometry.bank(req.addr);
        if busy == Some(bank) {
            stats.dcache_hit_stalls += 1;
            return DataResponse::HitStall;
        }

        let set = geometry.set(req.addr);
        let word = geometry.word(req.addr);
        let tags = &mut self.banks[bank];
        if let Some(way) = tags.lookup(set, geometry.tag(req.addr)) {
            tags.touch(set, way);
            let line = tags.line_mut(set, way);
            if let Some(value) = req.store {
                line.data[word] = merge_bytes(line.data[word], req.addr, req.size, value);
                line.dirty = true;
            }
            stats.dcache_hits += 1;
            trace!(addr = format_args!("{:#x}", req.addr), store = req.store.is_some(), "dcache hit");
            return DataResponse::HitComplete {
                addr: req.addr,
                word: line.data[word],
            };
        }

        let block = geometry.block_addr(req.addr);
        if self.mshr.full(block) {
            stats.dcache_hit_stalls += 1;
            return DataResponse::HitStall;
        }
        let merged = req.store.map(|value| MergedStore {
            addr: req.addr,
            size: req.size,
            value,
        });
        match self.mshr.add(block, merged) {
            MissKind::Primary => {
                debug!(block = format_args!("{block:#x}"), "dcache miss");
                stats.dcache_misses += 1;
                self.requests
                    .push_back(MemRequest::read(block, geometry.words()));
            }
            MissKind::Secondary => stats.dcache_merged += 1,
        }
        DataResponse::MissAccepted { addr: req.addr }
    }

    /// Installs a returning block. Returns its address when it was a read fill.
    fn fill(&mut self, resp: MemResponse, stats: &mut SimStats) -> Option<u32> {
        let MemReply::Data(mut data) = resp.reply else {
            return None;
        };
        let geometry = self.geometry;
        let block = resp.addr;
        let bank = geometry.bank(block);
        let set = geometry.set(block);

        let stores: Vec<MergedStore> = self.mshr.remove(block).into_iter().flatten().collect();
        for store in &stores {
            let w = geometry.word(store.addr);
            data[w] = merge_bytes(data[w], store.addr, store.size, store.value);
        }

        let (way, evicted) =
            self.banks[bank].install(set, geometry.tag(block), data, |old| geometry.base(old, set, bank));
        if !stores.is_empty() {
            self.banks[bank].line_mut(set, way).dirty = true;
        }
        if let Some(victim) = evicted.filter(|e| e.dirty) {
            debug!(addr = format_args!("{:#x}", victim.addr), "dcache write-back");
            stats.dcache_writebacks += 1;
            self.requests
                .push_back(MemRequest::write(victim.addr, victim.data));
        }
        debug!(block = format_args!("{block:#x}"), stores = stores.len(), "dcache fill");
        self.busy_bank = Some(bank);
        Some(block)
    }

    /// Writes every dirty line into `memory` and marks it clean.
    pub fn flush(&mut self, memory: &mut Memory) {
        let geometry = self.geometry;
        for (bank, tags) in self.banks.iter_mut().enumerate() {
            let dirty: Vec<(usize, usize)> = tags.dirty_lines().collect();
            for (set, way) in dirty {
                let line = tags.line_mut(set, way);
                memory.write_block(geometry.base(line.tag, set, bank), &line.data);
                line.dirty = false;
            }
        }
    }
}
