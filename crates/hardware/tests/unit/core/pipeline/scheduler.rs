//! Warp Scheduler Unit Tests.
//!
//! Tests are organised into the following categories:
//!   1. Lane alternation and group selection (round-robin, GTO, mocked policy)
//!   2. Issue buffer back-pressure
//!   3. Packet ends, write-off and redirects
//!   4. Barriers and halts

use mockall::predicate::eq;
use simt_core::core::pipeline::latch::Latch;
use simt_core::core::pipeline::latches::FetchEntry;
use simt_core::core::pipeline::scheduler::{GroupState, WarpScheduler};
use simt_core::core::pipeline::signals::{
    BranchSignal, DecodeSignal, FeedbackLinks, IssueBitmap, WritebackSignal,
};
use simt_core::config::IssuePolicy;
use simt_core::isa::PacketKind;
use simt_core::stats::SimStats;

use crate::common::harness::small_config;
use crate::common::mocks::policy::MockPolicy;

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

struct Bench {
    sched: WarpScheduler,
    fetch: Latch<FetchEntry>,
    links: FeedbackLinks,
    stats: SimStats,
}

impl Bench {
    fn new(warps: usize, policy: IssuePolicy, barrier: bool) -> Self {
        let mut config = small_config(warps);
        config.scheduler.policy = policy;
        config.scheduler.barrier = barrier;
        Self::with_scheduler(WarpScheduler::new(&config))
    }

    fn with_scheduler(sched: WarpScheduler) -> Self {
        Self {
            sched,
            fetch: Latch::new("fetch"),
            links: FeedbackLinks::default(),
            stats: SimStats::default(),
        }
    }

    /// One cycle; the fetch is consumed as an instruction cache hit would be.
    fn step(&mut self) -> FetchEntry {
        let entry = self.sched.tick(&mut self.fetch, &mut self.links, &mut self.stats);
        let _ = self.fetch.pop();
        entry
    }

    /// `(warp, pc)` of the next `n` fetches.
    fn fetches(&mut self, n: usize) -> Vec<(usize, u32)> {
        (0..n)
            .map(|_| {
                let e = self.step();
                (e.warp, e.pc)
            })
            .collect()
    }

    /// One cycle with the instruction cache holding fetch off, so only the
    /// feedback signals are applied.
    fn collide(&mut self) {
        self.links.icache.set_wait(true);
        let entry = self.sched.tick(&mut self.fetch, &mut self.links, &mut self.stats);
        assert!(entry.is_sentinel());
        self.links.icache.set_wait(false);
    }

    fn decode(&mut self, kind: PacketKind, warp: usize, pc: u32) {
        self.links.decode.send(DecodeSignal { kind, warp, pc });
        self.collide();
    }

    fn retire(&mut self, group: usize) {
        self.links.writeback.send(WritebackSignal { group });
        self.collide();
    }
}

// ══════════════════════════════════════════════════════════
// 1. Lane alternation and selection
// ══════════════════════════════════════════════════════════

#[test]
fn round_robin_alternates_lanes_then_rotates_groups() {
    let mut b = Bench::new(4, IssuePolicy::RoundRobin, false);
    assert_eq!(
        b.fetches(6),
        vec![
            (0, 0x1000),
            (1, 0x1000),
            (2, 0x1000),
            (3, 0x1000),
            (0, 0x1004),
            (1, 0x1004),
        ]
    );
    assert_eq!(b.stats.fetches, 6);
    assert_eq!(b.sched.groups()[0].in_flight, 4);
}

#[test]
fn greedy_then_oldest_sticks_to_one_group() {
    let mut b = Bench::new(4, IssuePolicy::GreedyThenOldest, false);
    assert_eq!(
        b.fetches(4),
        vec![(0, 0x1000), (1, 0x1000), (0, 0x1004), (1, 0x1004)]
    );
}

#[test]
fn single_warp_group_advances_every_fetch() {
    let mut b = Bench::new(3, IssuePolicy::RoundRobin, false);
    assert_eq!(b.sched.groups()[1].lanes(), 1);
    assert_eq!(
        b.fetches(5),
        vec![(0, 0x1000), (1, 0x1000), (2, 0x1000), (0, 0x1004), (1, 0x1004)]
    );
    assert_eq!(b.sched.groups()[1].pc, 0x1004);
}

#[test]
fn no_ready_group_yields_a_bubble() {
    let mut policy = MockPolicy::new();
    let _ = policy.expect_select().returning(|_| None);
    let _ = policy.expect_name().return_const("mock");
    let mut b = Bench::with_scheduler(WarpScheduler::with_policy(&small_config(2), Box::new(policy)));

    let entry = b.step();
    assert!(entry.is_sentinel());
    assert_eq!(b.stats.scheduler_bubbles, 1);
    assert_eq!(b.stats.fetches, 0);
}

#[test]
fn policy_is_advanced_after_the_odd_lane() {
    let mut policy = MockPolicy::new();
    let _ = policy.expect_select().returning(|_| Some(0));
    let _ = policy.expect_advance().with(eq(0)).times(1).return_const(());
    let _ = policy.expect_name().return_const("mock");
    let mut b = Bench::with_scheduler(WarpScheduler::with_policy(&small_config(2), Box::new(policy)));

    assert_eq!(b.fetches(2), vec![(0, 0x1000), (1, 0x1000)]);
}

#[test]
fn icache_miss_stalls_selection() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    b.links.icache.force_push(false);
    assert!(b.step().is_sentinel());
    b.links.icache.set_wait(true);
    assert!(b.step().is_sentinel());
    b.links.icache.set_wait(false);
    assert_eq!(b.step().warp, 0);
    assert_eq!(b.stats.scheduler_bubbles, 2);
}

#[test]
fn bubble_leaves_the_fetch_latch_empty() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    b.links.icache.set_wait(true);
    let entry = b.sched.tick(&mut b.fetch, &mut b.links, &mut b.stats);
    assert!(entry.is_sentinel());
    assert!(!b.fetch.is_valid());
    assert_eq!(b.sched.groups()[0].in_flight, 0);
}

#[test]
fn full_fetch_latch_yields_a_bubble() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    let first = b.sched.tick(&mut b.fetch, &mut b.links, &mut b.stats);
    assert!(!first.is_sentinel());
    let second = b.sched.tick(&mut b.fetch, &mut b.links, &mut b.stats);
    assert!(second.is_sentinel());
    assert_eq!(b.fetch.snoop(), Some(&first));
}

// ══════════════════════════════════════════════════════════
// 2. Issue buffer back-pressure
// ══════════════════════════════════════════════════════════

#[test]
fn full_buffer_stalls_its_group_until_cleared() {
    let mut b = Bench::new(4, IssuePolicy::GreedyThenOldest, false);
    let _ = b.fetches(2);
    b.links.issue.force_push(IssueBitmap(vec![true, false]));
    assert_eq!(b.step().warp, 2);
    assert_eq!(b.sched.groups()[0].state, GroupState::Stall);

    b.links.issue.force_push(IssueBitmap(vec![false, false]));
    let _ = b.step();
    assert_eq!(b.sched.groups()[0].state, GroupState::Ready);
}

// ══════════════════════════════════════════════════════════
// 3. Packet ends
// ══════════════════════════════════════════════════════════

#[test]
fn packet_end_writes_off_over_fetch_and_bumps_epoch() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    // w0@1000 w1@1000 w0@1004 w1@1004 w0@1008
    let _ = b.fetches(5);
    assert_eq!(b.sched.groups()[0].in_flight, 5);

    b.decode(PacketKind::Eop, 1, 0x1000);
    let g = &b.sched.groups()[0];
    assert_eq!(g.state, GroupState::Stall);
    assert!(g.finished_packet);
    assert_eq!(g.in_flight, 2);
    assert_eq!(g.pc, 0x1004);
    assert_eq!(g.epoch, 1);
    assert!(!g.last_issue_even);
}

#[test]
fn even_warp_packet_signal_is_ignored() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    let _ = b.fetches(2);
    b.decode(PacketKind::Eop, 0, 0x1000);
    assert_eq!(b.sched.groups()[0].state, GroupState::Ready);
    assert_eq!(b.sched.groups()[0].epoch, 0);
}

#[test]
fn drained_group_resumes_at_the_next_packet() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    let _ = b.fetches(3);
    b.decode(PacketKind::Eop, 1, 0x1000);
    assert_eq!(b.sched.groups()[0].in_flight, 2);

    assert!(b.step().is_sentinel());
    b.retire(0);
    assert_eq!(b.sched.groups()[0].state, GroupState::Stall);
    b.links.writeback.send(WritebackSignal { group: 0 });
    let next = b.step();
    assert_eq!((next.warp, next.pc, next.epoch), (0, 0x1004, 1));
}

#[test]
fn redirect_is_taken_once_the_group_drains() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    let _ = b.fetches(2);
    b.decode(PacketKind::Eop, 1, 0x1000);
    b.links.branch.send(BranchSignal {
        group: 0,
        dest: 0x2000,
    });
    b.collide();
    assert_eq!(b.sched.groups()[0].redirect, Some(0x2000));
    assert_eq!(b.sched.groups()[0].pc, 0x1004);

    b.retire(0);
    b.retire(0);
    let g = &b.sched.groups()[0];
    assert_eq!(g.state, GroupState::Ready);
    assert_eq!(g.pc, 0x2000);
    assert_eq!(g.redirect, None);
    assert_eq!(b.stats.redirects, 1);
    assert_eq!(b.step().pc, 0x2000);
}

// ══════════════════════════════════════════════════════════
// 4. Barriers and halts
// ══════════════════════════════════════════════════════════

#[test]
fn barrier_releases_when_every_group_arrives_and_drains() {
    let mut b = Bench::new(4, IssuePolicy::RoundRobin, true);
    let _ = b.fetches(4);
    b.decode(PacketKind::Barrier, 1, 0x1000);
    b.decode(PacketKind::Barrier, 3, 0x1000);
    assert_eq!(b.sched.at_barrier(), 2);

    b.retire(0);
    b.retire(0);
    b.retire(1);
    assert_eq!(b.stats.barrier_releases, 0);
    assert_eq!(b.sched.groups()[0].state, GroupState::Barrier);

    b.retire(1);
    assert_eq!(b.stats.barrier_releases, 1);
    assert_eq!(b.sched.at_barrier(), 0);
    for g in b.sched.groups() {
        assert_eq!(g.state, GroupState::Ready);
        assert_eq!(g.pc, 0x1004);
    }
}

#[test]
fn halted_groups_do_not_hold_the_barrier() {
    let mut b = Bench::new(4, IssuePolicy::RoundRobin, true);
    let _ = b.fetches(4);
    b.decode(PacketKind::Halt, 3, 0x1000);
    b.decode(PacketKind::Barrier, 1, 0x1000);
    b.retire(0);
    b.retire(0);
    assert_eq!(b.stats.barrier_releases, 1);
    assert_eq!(b.sched.groups()[0].state, GroupState::Ready);
    assert_eq!(b.sched.groups()[1].state, GroupState::Halt);
}

#[test]
fn halt_is_permanent() {
    let mut b = Bench::new(2, IssuePolicy::RoundRobin, false);
    let _ = b.fetches(2);
    b.decode(PacketKind::Halt, 1, 0x1000);
    assert!(b.sched.all_halted());
    b.retire(0);
    b.retire(0);
    b.links.issue.force_push(IssueBitmap(vec![false]));
    assert!(b.step().is_sentinel());
    assert_eq!(b.sched.groups()[0].state, GroupState::Halt);
}
