//! Lockup-free instruction cache.
//!
//! Fetches from the scheduler enter an in-order delivery queue. A hit carries
//! its instruction word immediately; a miss records its slot in the MSHR and
//! waits for the fill, so a hit can never overtake an older miss on its way to
//! decode. Misses to a block that is already being filled merge into the
//! outstanding entry without a second memory request.
//!
//! Every cycle the cache reports the lookup outcome on the hit link and keeps
//! the link's `wait` flag raised for as long as any miss is outstanding.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::mshr::{MissKind, Table};
use super::{Geometry, TagArray};
use crate::config::CacheConfig;
use crate::core::pipeline::latch::{ForwardingIf, Latch};
use crate::core::pipeline::latches::{FetchEntry, FetchedEntry};
use crate::soc::interconnect::{MemReply, MemRequest, MemResponse};
use crate::stats::SimStats;

/// A fetch waiting for delivery.
#[derive(Clone, Copy, Debug)]
struct Slot {
    seq: u64,
    fetch: FetchEntry,
    raw: Option<u32>,
}

/// Set-associative, read-only L1 instruction cache.
#[derive(Clone, Debug)]
pub struct InstructionCache {
    geometry: Geometry,
    tags: TagArray,
    mshr: Table<u64>,
    queue: VecDeque<Slot>,
    queue_cap: usize,
    next_seq: u64,
    requests: VecDeque<MemRequest>,
}

impl InstructionCache {
    /// Builds an empty cache from a validated configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let geometry = Geometry {
            block_bytes: config.block_bytes as u32,
            banks: 1,
            sets: config.sets() as u32,
            ways: config.ways,
        };
        Self {
            geometry,
            tags: TagArray::new(config.sets(), config.ways, geometry.words()),
            mshr: Table::new(config.mshr_entries, config.mshr_max_merge),
            queue: VecDeque::new(),
            queue_cap: config.fetch_queue,
            next_seq: 0,
            requests: VecDeque::new(),
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

    /// Returns `true` when no fetch, miss or memory request is pending.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.mshr.is_empty() && self.requests.is_empty()
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `input` - Fetch latch written by the scheduler.
    /// * `output` - Latch read by decode.
    /// * `hit_link` - Hit/miss feedback to the scheduler and decode.
    /// * `mem_req` - Request latch read by the arbiter.
    /// * `mem_resp` - Response latch written by the demux.
    /// * `stats` - Counters.
    pub fn tick(
        &mut self,
        input: &mut Latch<FetchEntry>,
        output: &mut Latch<FetchedEntry>,
        hit_link: &mut ForwardingIf<bool>,
        mem_req: &mut Latch<MemRequest>,
        mem_resp: &mut Latch<MemResponse>,
        stats: &mut SimStats,
    ) {
        if let Some(resp) = mem_resp.pop() {
            self.fill(resp);
        }

        if let Some(&fetch) = input.snoop() {
            let hit = self.lookup(fetch.pc);
            hit_link.force_push(hit.is_some());
            if self.accept(fetch, hit, output.ready_for_push(), stats) {
                let _ = input.pop();
            }
        }

        if self.queue.front().is_some_and(|slot| slot.raw.is_some())
            && output.ready_for_push()
            && let Some(Slot {
                fetch,
                raw: Some(raw),
                ..
            }) = self.queue.pop_front()
        {
            trace!(warp = fetch.warp, pc = format_args!("{:#x}", fetch.pc), "icache deliver");
            output.send(FetchedEntry { fetch, raw });
        }

        if mem_req.ready_for_push()
            && let Some(req) = self.requests.pop_front()
        {
            mem_req.send(req);
        }

        hit_link.set_wait(!self.mshr.is_empty());
        self.mshr.tick();
    }

    /// Word at `pc` if its block is resident.
    fn lookup(&mut self, pc: u32) -> Option<u32> {
        let set = self.geometry.set(pc);
        let way = self.tags.lookup(set, self.geometry.tag(pc))?;
        self.tags.touch(set, way);
        Some(self.tags.line(set, way).data[self.geometry.word(pc)])
    }

    /// Tries to take `fetch` into the delivery queue. Returns `false` to stall it.
    fn accept(
        &mut self,
        fetch: FetchEntry,
        hit: Option<u32>,
        output_ready: bool,
        stats: &mut SimStats,
    ) -> bool {
        if let Some(raw) = hit {
            if self.queue.len() >= self.queue_cap || (self.queue.is_empty() && !output_ready) {
                return false;
            }
            stats.icache_hits += 1;
            let _ = self.enqueue(fetch, Some(raw));
            return true;
        }

        let block = self.geometry.block_addr(fetch.pc);
        if self.mshr.full(block) || self.queue.len() >= self.queue_cap {
            stats.icache_stalls += 1;
            return false;
        }
        let seq = self.enqueue(fetch, None);
        match self.mshr.add(block, seq) {
            MissKind::Primary => {
                debug!(warp = fetch.warp, block = format_args!("{block:#x}"), "icache miss");
                stats.icache_misses += 1;
                self.requests
                    .push_back(MemRequest::read(block, self.geometry.words()));
            }
            MissKind::Secondary => stats.icache_merged += 1,
        }
        true
    }

    fn enqueue(&mut self, fetch: FetchEntry, raw: Option<u32>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push_back(Slot { seq, fetch, raw });
        seq
    }

    /// Installs a block and hands its words to every fetch merged on it.
    fn fill(&mut self, resp: MemResponse) {
        let MemReply::Data(data) = resp.reply else {
            return;
        };
        let block = resp.addr;
        let set = self.geometry.set(block);
        let tag = self.geometry.tag(block);
        let geometry = self.geometry;
        let (way, _) = self
            .tags
            .install(set, tag, data, |old| geometry.base(old, set, 0));
        let waiters = self.mshr.remove(block);
        debug!(block = format_args!("{block:#x}"), waiters = waiters.len(), "icache fill");
        for seq in waiters {
            if let Some(slot) = self.queue.iter_mut().find(|slot| slot.seq == seq) {
                slot.raw = Some(self.tags.line(set, way).data[geometry.word(slot.fetch.pc)]);
            }
        }
    }
}
