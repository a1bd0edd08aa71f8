//! Decode Stage Unit Tests.
//!
//! Verifies predicate reads, the decode signal, and the epoch fence that
//! squashes fetches issued past a packet end.

use simt_core::common::LaneMask;
use simt_core::core::arch::PredicateFile;
use simt_core::core::pipeline::latch::Latch;
use simt_core::core::pipeline::latches::{FetchEntry, FetchedEntry, Instruction};
use simt_core::core::pipeline::signals::FeedbackLinks;
use simt_core::core::pipeline::stages::DecodeStage;
use simt_core::isa::PacketKind;
use simt_core::stats::SimStats;

use crate::common::builder::instruction::asm;
use crate::common::harness::small_config;

struct Bench {
    stage: DecodeStage,
    input: Latch<FetchedEntry>,
    output: Latch<Instruction>,
    links: FeedbackLinks,
    preds: PredicateFile,
    stats: SimStats,
}

impl Bench {
    fn new(warps: usize) -> Self {
        Self {
            stage: DecodeStage::new(&small_config(warps)),
            input: Latch::new("fetched"),
            output: Latch::new("decoded"),
            links: FeedbackLinks::default(),
            preds: PredicateFile::new(warps),
            stats: SimStats::default(),
        }
    }

    fn feed(&mut self, warp: usize, pc: u32, epoch: u32, raw: u32) {
        self.input.send(FetchedEntry {
            fetch: FetchEntry { pc, warp, epoch },
            raw,
        });
    }

    fn tick(&mut self) -> Option<Instruction> {
        self.stage.tick(
            &mut self.input,
            &mut self.output,
            &mut self.links,
            &self.preds,
            &mut self.stats,
        );
        let _ = self.links.decode.pop();
        self.output.pop()
    }
}

#[test]
fn decodes_and_signals_the_scheduler() {
    let mut b = Bench::new(2);
    b.feed(1, 0x1008, 0, asm().addi(3, 1, 5).build());
    b.stage.tick(&mut b.input, &mut b.output, &mut b.links, &b.preds, &mut b.stats);

    let signal = b.links.decode.pop().unwrap();
    assert_eq!(signal.kind, PacketKind::Normal);
    assert_eq!((signal.warp, signal.pc), (1, 0x1008));

    let inst = b.output.pop().unwrap();
    assert_eq!(inst.warp, 1);
    assert_eq!(inst.group, 0);
    assert_eq!(inst.decoded.rd, Some(3));
    assert_eq!(inst.predicate, LaneMask::ALL);
    assert_eq!(b.stats.decoded, 1);
}

#[test]
fn guard_predicate_is_read_at_decode() {
    let mut b = Bench::new(2);
    let mask = LaneMask::from_bits(0x0000_FFFF);
    b.preds.write(0, 2, mask);
    b.feed(0, 0x1000, 0, asm().addi(3, 0, 1).pred(2).build());
    assert_eq!(b.tick().unwrap().predicate, mask);
}

#[test]
fn jpnz_operand_predicate_is_captured() {
    let mut b = Bench::new(2);
    b.preds.write(1, 4, LaneMask::from_bits(0b100));
    b.feed(1, 0x1000, 0, asm().jpnz(4, 12).build());
    let inst = b.tick().unwrap();
    assert_eq!(inst.pred_value, LaneMask::from_bits(0b100));
    assert_eq!(inst.predicate, LaneMask::ALL);
    assert_eq!(inst.packet, PacketKind::Eop);
}

#[test]
fn fetches_past_a_packet_end_are_squashed() {
    let mut b = Bench::new(2);
    b.feed(1, 0x1000, 0, asm().addi(1, 0, 1).eop().build());
    assert!(b.tick().is_some());

    b.feed(0, 0x1004, 0, asm().addi(2, 0, 1).build());
    assert!(b.tick().is_none());
    assert_eq!(b.stats.squashed, 1);
    assert!(b.links.decode.snoop().is_none());

    b.feed(0, 0x1004, 1, asm().addi(2, 0, 1).build());
    assert!(b.tick().is_some());
    assert_eq!(b.stats.decoded, 2);
}

#[test]
fn even_warp_packet_end_does_not_fence() {
    let mut b = Bench::new(2);
    b.feed(0, 0x1000, 0, asm().addi(1, 0, 1).eop().build());
    assert!(b.tick().is_some());
    b.feed(1, 0x1000, 0, asm().addi(1, 0, 1).eop().build());
    assert!(b.tick().is_some());
    assert_eq!(b.stats.squashed, 0);
}

#[test]
fn lone_warp_of_an_odd_group_fences_its_own_group() {
    let mut b = Bench::new(3);
    b.feed(2, 0x1000, 0, asm().addi(1, 0, 1).eop().build());
    assert!(b.tick().is_some());
    b.feed(2, 0x1004, 0, asm().addi(1, 0, 1).build());
    assert!(b.tick().is_none());
    assert_eq!(b.stats.squashed, 1);
}

#[test]
fn fences_are_per_group() {
    let mut b = Bench::new(4);
    b.feed(1, 0x1000, 0, asm().halt().build());
    assert!(b.tick().is_some());
    b.feed(2, 0x1004, 0, asm().addi(1, 0, 1).build());
    assert!(b.tick().is_some());
}

#[test]
fn holds_while_the_icache_is_waiting() {
    let mut b = Bench::new(2);
    b.feed(0, 0x1000, 0, asm().add(1, 2, 3).build());
    b.links.icache.set_wait(true);
    assert!(b.tick().is_none());
    assert!(b.input.is_valid());
    b.links.icache.set_wait(false);
    assert!(b.tick().is_some());
}

#[test]
fn holds_while_the_output_is_full() {
    let mut b = Bench::new(2);
    b.feed(0, 0x1000, 0, asm().add(1, 2, 3).build());
    b.stage.tick(&mut b.input, &mut b.output, &mut b.links, &b.preds, &mut b.stats);
    let _ = b.links.decode.pop();

    b.feed(1, 0x1000, 0, asm().add(1, 2, 3).build());
    b.stage.tick(&mut b.input, &mut b.output, &mut b.links, &b.preds, &mut b.stats);
    assert!(b.input.is_valid());
    assert_eq!(b.stats.decoded, 1);
}
