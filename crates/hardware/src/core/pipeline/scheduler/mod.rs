//! Warp Scheduler.
//!
//! Warps are paired into warp-groups (`2g` even, `2g + 1` odd) that share one
//! PC. Each cycle the scheduler performs the following:
//! 1. **Collision step:** Applies every feedback signal that arrived: packet
//!    ends from decode, redirects from the branch unit, the issue buffer-full
//!    bitmap, retirements from writeback, and barrier release. This runs even
//!    when nothing can be fetched.
//! 2. **Selection:** Asks the configured policy for a ready group, unless the
//!    instruction cache is waiting on a miss.
//! 3. **Lane alternation:** The even warp fetches first, the odd warp fetches
//!    the same PC, and only then does the PC advance.
//!
//! A group that reaches the end of a packet stalls until every instruction it
//! has in flight has retired. Fetches already made past the packet end are
//! written off here and dropped by decode, which recognizes them by their
//! stale epoch.

/// Warp-group selection policies.
pub mod policy;

use tracing::{debug, trace};

use self::policy::SchedulePolicy;
use super::latch::Latch;
use super::latches::FetchEntry;
use super::signals::{BranchSignal, DecodeSignal, FeedbackLinks, IssueBitmap, WritebackSignal};
use crate::common::constants::{INSTRUCTION_SIZE, WARPS_PER_GROUP};
use crate::config::Config;
use crate::isa::PacketKind;
use crate::stats::SimStats;

pub use self::policy::{GreedyThenOldest, RoundRobin};

/// Scheduling state of a warp-group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupState {
    /// May fetch.
    Ready,
    /// Waiting for its packet to drain or for issue buffer space.
    Stall,
    /// Waiting at a barrier for every other live group.
    Barrier,
    /// Finished; never fetches again.
    Halt,
}

/// Fetch state of one warp-group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarpGroup {
    /// Next PC to fetch.
    pub pc: u32,
    /// Scheduling state.
    pub state: GroupState,
    /// Fetched instructions that have not yet retired.
    pub in_flight: u32,
    /// The even warp has fetched `pc` and the odd warp has not.
    pub last_issue_even: bool,
    /// The current packet has ended; the group waits for it to drain.
    pub finished_packet: bool,
    /// Packet counter stamped on every fetch.
    pub epoch: u32,
    /// Branch target to take once the group drains.
    pub redirect: Option<u32>,
    lanes: u32,
}

impl WarpGroup {
    fn new(pc: u32, lanes: u32) -> Self {
        Self {
            pc,
            state: GroupState::Ready,
            in_flight: 0,
            last_issue_even: false,
            finished_packet: false,
            epoch: 0,
            redirect: None,
            lanes,
        }
    }

    /// Warps in this group (2, or 1 for the last group of an odd warp count).
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Returns the group to READY and takes any pending redirect.
    fn resume(&mut self, group: usize, stats: &mut SimStats) {
        self.state = GroupState::Ready;
        self.finished_packet = false;
        if let Some(dest) = self.redirect.take() {
            debug!(group, from = format_args!("{:#x}", self.pc), to = format_args!("{dest:#x}"), "redirect");
            self.pc = dest;
            stats.redirects += 1;
        }
    }

    const fn is_parked(&self) -> bool {
        matches!(self.state, GroupState::Barrier | GroupState::Halt)
    }
}

/// Per-group fetch sequencer.
pub struct WarpScheduler {
    groups: Vec<WarpGroup>,
    warp_count: usize,
    policy: Box<dyn SchedulePolicy>,
    barrier_enabled: bool,
    at_barrier: usize,
}

impl std::fmt::Debug for WarpScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpScheduler")
            .field("groups", &self.groups)
            .field("warp_count", &self.warp_count)
            .field("policy", &self.policy.name())
            .field("barrier_enabled", &self.barrier_enabled)
            .field("at_barrier", &self.at_barrier)
            .finish()
    }
}

impl WarpScheduler {
    /// Creates a scheduler using the policy named in `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_policy(config, policy::build(config.scheduler.policy))
    }

    /// Creates a scheduler with an explicit selection policy.
    pub fn with_policy(config: &Config, policy: Box<dyn SchedulePolicy>) -> Self {
        let warp_count = config.general.warp_count;
        let groups = (0..config.group_count())
            .map(|g| {
                let lanes = (warp_count - g * WARPS_PER_GROUP).min(WARPS_PER_GROUP);
                WarpGroup::new(config.general.start_pc, lanes as u32)
            })
            .collect();
        Self {
            groups,
            warp_count,
            policy,
            barrier_enabled: config.scheduler.barrier,
            at_barrier: 0,
        }
    }

    /// All warp-groups.
    pub fn groups(&self) -> &[WarpGroup] {
        &self.groups
    }

    /// Mutable access to one group, for seeding PCs before a run.
    pub fn group_mut(&mut self, group: usize) -> &mut WarpGroup {
        &mut self.groups[group]
    }

    /// Groups currently waiting at the barrier.
    pub const fn at_barrier(&self) -> usize {
        self.at_barrier
    }

    /// Returns `true` once every group has halted.
    pub fn all_halted(&self) -> bool {
        self.groups.iter().all(|g| g.state == GroupState::Halt)
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `fetch` - Latch into the instruction cache, gated on the cache's hit link.
    /// * `links` - Feedback links; every pending signal is consumed.
    /// * `stats` - Counters.
    ///
    /// # Returns
    ///
    /// The fetch that was issued, or [`FetchEntry::SENTINEL`] for a bubble.
    /// The sentinel is never pushed; downstream stages see the bubble as an
    /// empty fetch latch.
    pub fn tick(
        &mut self,
        fetch: &mut Latch<FetchEntry>,
        links: &mut FeedbackLinks,
        stats: &mut SimStats,
    ) -> FetchEntry {
        if let Some(sig) = links.decode.pop() {
            self.on_decode(sig);
        }
        if let Some(sig) = links.branch.pop() {
            self.on_branch(sig);
        }
        if let Some(bitmap) = links.issue.pop() {
            self.on_issue(&bitmap);
        }
        if let Some(sig) = links.writeback.pop() {
            self.on_writeback(sig, stats);
        }
        self.release_barrier(stats);

        let hit = links.icache.pop();
        if links.icache.is_waiting() || hit == Some(false) || !fetch.ready_for_push_gated(&links.icache) {
            stats.scheduler_bubbles += 1;
            return FetchEntry::SENTINEL;
        }

        let ready: Vec<bool> = self.groups.iter().map(|g| g.state == GroupState::Ready).collect();
        let Some(g) = self.policy.select(&ready) else {
            stats.scheduler_bubbles += 1;
            return FetchEntry::SENTINEL;
        };

        let group = &self.groups[g];
        let entry = FetchEntry {
            pc: group.pc,
            warp: g * WARPS_PER_GROUP + usize::from(group.last_issue_even),
            epoch: group.epoch,
        };
        if fetch.push_gated(entry, &links.icache).is_err() {
            stats.scheduler_bubbles += 1;
            return FetchEntry::SENTINEL;
        }

        let group = &mut self.groups[g];
        group.in_flight += 1;
        if group.lanes > 1 && !group.last_issue_even {
            group.last_issue_even = true;
        } else {
            group.last_issue_even = false;
            group.pc = group.pc.wrapping_add(INSTRUCTION_SIZE);
            self.policy.advance(g);
        }
        stats.fetches += 1;
        trace!(group = g, warp = entry.warp, pc = format_args!("{:#x}", entry.pc), "fetch");
        entry
    }

    /// Packet-end handling. Only the group's last warp reports; the other warp
    /// decoded the same instruction one fetch earlier.
    fn on_decode(&mut self, sig: DecodeSignal) {
        let g = sig.warp / WARPS_PER_GROUP;
        let Some(group) = self.groups.get(g) else {
            return;
        };
        if sig.warp != g * WARPS_PER_GROUP + group.lanes as usize - 1 {
            return;
        }
        let state = match sig.kind {
            PacketKind::Eop => GroupState::Stall,
            PacketKind::Barrier => {
                self.at_barrier += 1;
                GroupState::Barrier
            }
            PacketKind::Halt => GroupState::Halt,
            PacketKind::Normal | PacketKind::Mop => return,
        };
        let group = &mut self.groups[g];
        let resume_pc = sig.pc.wrapping_add(INSTRUCTION_SIZE);
        let past = group.pc.saturating_sub(resume_pc) / INSTRUCTION_SIZE * group.lanes
            + u32::from(group.last_issue_even);
        group.in_flight = group.in_flight.saturating_sub(past);
        group.pc = resume_pc;
        group.last_issue_even = false;
        group.finished_packet = true;
        group.epoch = group.epoch.wrapping_add(1);
        group.state = state;
        debug!(group = g, kind = ?sig.kind, pc = format_args!("{:#x}", sig.pc), written_off = past, "packet end");
    }

    fn on_branch(&mut self, sig: BranchSignal) {
        if let Some(group) = self.groups.get_mut(sig.group) {
            group.redirect = Some(sig.dest);
        }
    }

    fn on_issue(&mut self, bitmap: &IssueBitmap) {
        for (g, group) in self.groups.iter_mut().enumerate() {
            if group.is_parked() {
                continue;
            }
            if bitmap.is_full(g) {
                group.state = GroupState::Stall;
            } else if !group.finished_packet {
                group.state = GroupState::Ready;
            }
        }
    }

    fn on_writeback(&mut self, sig: WritebackSignal, stats: &mut SimStats) {
        let Some(group) = self.groups.get_mut(sig.group) else {
            return;
        };
        group.in_flight = group.in_flight.saturating_sub(1);
        if group.in_flight == 0 && !group.is_parked() {
            group.resume(sig.group, stats);
        }
    }

    /// Releases every group at the barrier once all live groups have arrived
    /// and drained.
    fn release_barrier(&mut self, stats: &mut SimStats) {
        if !self.barrier_enabled || self.at_barrier == 0 {
            return;
        }
        let arrived = self.groups.iter().all(|g| {
            g.state == GroupState::Halt || (g.state == GroupState::Barrier && g.in_flight == 0)
        });
        if !arrived {
            return;
        }
        for (g, group) in self.groups.iter_mut().enumerate() {
            if group.state == GroupState::Barrier {
                group.resume(g, stats);
            }
        }
        debug!(groups = self.at_barrier, "barrier release");
        self.at_barrier = 0;
        stats.barrier_releases += 1;
    }
}
