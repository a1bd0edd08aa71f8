//! Issue Stage Unit Tests.
//!
//! Covers the per-group instruction buffers, the bitmap sent back to the
//! scheduler, scoreboard holds, operand reads and routing to unit latches.

use simt_core::common::LaneMask;
use simt_core::common::constants::CSR_THREAD_ID;
use simt_core::core::arch::ArchState;
use simt_core::core::pipeline::latch::{ForwardingIf, Latch};
use simt_core::core::pipeline::latches::{FetchEntry, Instruction};
use simt_core::core::pipeline::scoreboard::Scoreboard;
use simt_core::core::pipeline::signals::IssueBitmap;
use simt_core::core::pipeline::stages::IssueStage;
use simt_core::isa::{FuKind, decode, packet_kind};
use simt_core::stats::{SimStats, UNIT_COUNT};

use crate::common::builder::instruction::asm;
use crate::common::harness::small_config;

fn inst(warp: usize, raw: u32) -> Instruction {
    let d = decode(raw);
    Instruction::new(
        FetchEntry {
            pc: 0x1000,
            warp,
            epoch: 0,
        },
        d,
        packet_kind(&d, false),
        LaneMask::ALL,
    )
}

struct Bench {
    stage: IssueStage,
    input: Latch<Instruction>,
    dispatch: Vec<Latch<Instruction>>,
    link: ForwardingIf<IssueBitmap>,
    scoreboard: Scoreboard,
    arch: ArchState,
    stats: SimStats,
}

impl Bench {
    fn new(warps: usize, depth: usize) -> Self {
        let mut config = small_config(warps);
        config.issue.ibuffer_depth = depth;
        Self {
            stage: IssueStage::new(&config),
            input: Latch::new("decoded"),
            dispatch: (0..UNIT_COUNT).map(|_| Latch::new("dispatch")).collect(),
            link: ForwardingIf::new("issue_bitmap"),
            scoreboard: Scoreboard::new(warps),
            arch: ArchState::new(warps),
            stats: SimStats::default(),
        }
    }

    fn tick(&mut self) -> IssueBitmap {
        self.stage.tick(
            &mut self.input,
            &mut self.dispatch,
            &mut self.link,
            &mut self.scoreboard,
            &self.arch,
            &mut self.stats,
        );
        self.link.pop().unwrap()
    }

    fn unit(&mut self, kind: FuKind) -> Option<Instruction> {
        self.dispatch[kind.index()].pop()
    }
}

#[test]
fn buffers_then_dispatches_with_operands() {
    let mut b = Bench::new(2, 4);
    b.arch.regs.write_lane(1, 2, 0, 40);
    b.arch.regs.write_lane(1, 3, 0, 2);
    b.input.send(inst(1, asm().add(4, 2, 3).build()));

    let _ = b.tick();
    assert_eq!(b.stage.buffered(0), 1);
    assert!(!b.input.is_valid());

    let _ = b.tick();
    let out = b.unit(FuKind::Alu).unwrap();
    assert_eq!(out.rs1_val[0], 40);
    assert_eq!(out.rs2_val[0], 2);
    assert!(b.scoreboard.is_pending(1, 4));
    assert_eq!(b.stats.dispatched, 1);
    assert!(b.stage.is_idle());
}

#[test]
fn routes_by_unit_class() {
    let mut b = Bench::new(2, 4);
    b.input.send(inst(0, asm().mul(1, 2, 3).build()));
    let _ = b.tick();
    b.input.send(inst(0, asm().lw(4, 5, 0).build()));
    let _ = b.tick();
    let _ = b.tick();
    assert!(b.unit(FuKind::IntMul).is_some());
    assert!(b.unit(FuKind::LoadStore).is_some());
    assert!(b.unit(FuKind::Alu).is_none());
}

#[test]
fn csrr_reads_the_csr_at_issue() {
    let mut b = Bench::new(2, 4);
    b.input.send(inst(1, asm().csrr(1, u32::from(CSR_THREAD_ID)).build()));
    let _ = b.tick();
    let _ = b.tick();
    let out = b.unit(FuKind::Alu).unwrap();
    assert_eq!(out.csr_val[0], 32);
    assert_eq!(out.csr_val[31], 63);
}

#[test]
fn partial_immediate_reads_its_destination() {
    let mut b = Bench::new(2, 4);
    b.arch.regs.write_lane(0, 6, 0, 0x1234_5678);
    b.input.send(inst(0, asm().lli(6, 0xABC).build()));
    let _ = b.tick();
    let _ = b.tick();
    assert_eq!(b.unit(FuKind::Alu).unwrap().rd_val[0], 0x1234_5678);
}

#[test]
fn scoreboard_holds_a_dependent_head() {
    let mut b = Bench::new(2, 4);
    b.scoreboard.reserve(0, &decode(asm().lw(5, 1, 0).build()));
    b.input.send(inst(0, asm().add(6, 5, 5).build()));
    let _ = b.tick();
    let _ = b.tick();
    assert!(b.unit(FuKind::Alu).is_none());
    assert_eq!(b.stats.scoreboard_stalls, 1);

    b.scoreboard.release(0, &decode(asm().lw(5, 1, 0).build()));
    let _ = b.tick();
    assert!(b.unit(FuKind::Alu).is_some());
}

#[test]
fn held_group_does_not_block_others() {
    let mut b = Bench::new(4, 4);
    b.scoreboard.reserve(0, &decode(asm().lw(5, 1, 0).build()));
    b.input.send(inst(0, asm().add(6, 5, 5).build()));
    let _ = b.tick();
    b.input.send(inst(2, asm().addi(1, 0, 1).build()));
    let _ = b.tick();
    let _ = b.tick();
    let out = b.unit(FuKind::Alu).unwrap();
    assert_eq!(out.warp, 2);
    assert_eq!(b.stage.buffered(0), 1);
}

#[test]
fn busy_unit_latch_holds_dispatch() {
    let mut b = Bench::new(2, 4);
    b.dispatch[FuKind::Alu.index()].send(inst(1, asm().addi(9, 0, 1).build()));
    b.input.send(inst(0, asm().addi(1, 0, 1).build()));
    let _ = b.tick();
    let _ = b.tick();
    assert_eq!(b.stage.buffered(0), 1);
    assert_eq!(b.stats.dispatched, 0);
    assert_eq!(b.stats.scoreboard_stalls, 0);
}

#[test]
fn full_buffer_is_reported_and_blocks_input() {
    let mut b = Bench::new(4, 1);
    b.dispatch[FuKind::Alu.index()].send(inst(1, asm().addi(9, 0, 1).build()));
    b.input.send(inst(0, asm().addi(1, 0, 1).build()));
    let bitmap = b.tick();
    assert_eq!(bitmap, IssueBitmap(vec![true, false]));

    b.input.send(inst(1, asm().addi(2, 0, 1).build()));
    let _ = b.tick();
    assert!(b.input.is_valid());
    assert_eq!(b.stage.buffered(0), 1);
}

#[test]
fn groups_are_served_round_robin() {
    let mut b = Bench::new(4, 4);
    b.dispatch[FuKind::Alu.index()].send(inst(1, asm().addi(9, 0, 1).build()));
    for (warp, rd) in [(0, 1), (0, 2), (3, 3)] {
        b.input.send(inst(warp, asm().addi(rd, 0, 1).build()));
        let _ = b.tick();
    }
    let _ = b.unit(FuKind::Alu);

    let mut order = Vec::new();
    for _ in 0..3 {
        let _ = b.tick();
        let out = b.unit(FuKind::Alu).unwrap();
        order.push((out.warp, out.decoded.rd));
    }
    assert_eq!(order, vec![(0, Some(1)), (3, Some(3)), (0, Some(2))]);
}
