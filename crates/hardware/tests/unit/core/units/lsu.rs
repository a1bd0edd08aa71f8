//! Load/Store Unit Tests.
//!
//! Tests are organised into the following categories:
//!   1. Lane service (hits, same-word coalescing, parked misses)
//!   2. Ordering and back-pressure
//!   3. Address map checks

use simt_core::common::{LaneMask, MemoryError};
use simt_core::core::pipeline::latch::Latch;
use simt_core::core::pipeline::latches::{FetchEntry, Instruction};
use simt_core::core::units::LoadStoreUnit;
use simt_core::core::units::cache::{DataRequest, DataResponse};
use simt_core::isa::{decode, packet_kind};
use simt_core::stats::SimStats;
use simt_core::Config;

use crate::common::builder::instruction::asm;
use crate::common::harness::{HEAP_BASE, small_config};

struct Bench {
    lsu: LoadStoreUnit,
    dispatch: Latch<Instruction>,
    req: Latch<DataRequest>,
    resp: Latch<DataResponse>,
    stats: SimStats,
}

impl Bench {
    fn with_config(config: &Config) -> Self {
        Self {
            lsu: LoadStoreUnit::new(config),
            dispatch: Latch::new("lsu"),
            req: Latch::new("lsu_req"),
            resp: Latch::new("lsu_resp"),
            stats: SimStats::default(),
        }
    }

    fn new() -> Self {
        Self::with_config(&small_config(2))
    }

    fn tick(&mut self) -> Result<(), MemoryError> {
        self.lsu
            .tick(&mut self.dispatch, &mut self.req, &mut self.resp, &mut self.stats)
    }

    fn step(&mut self) -> Option<DataRequest> {
        self.tick().unwrap();
        self.req.pop()
    }
}

/// A memory instruction with `addrs[lane]` in `rs1` of the lanes in `mask`.
fn mem_inst(raw: u32, mask: u32, addrs: &[u32]) -> Instruction {
    let d = decode(raw);
    let mut inst = Instruction::new(
        FetchEntry {
            pc: 0x1000,
            warp: 0,
            epoch: 0,
        },
        d,
        packet_kind(&d, false),
        LaneMask::from_bits(mask),
    );
    for (lane, &addr) in addrs.iter().enumerate() {
        inst.rs1_val[lane] = addr;
        inst.rs2_val[lane] = 0xA0 + lane as u32;
    }
    inst
}

fn load(addrs: &[u32]) -> Instruction {
    let mask = (1u32 << addrs.len()) - 1;
    mem_inst(asm().lw(5, 1, 0).build(), mask, addrs)
}

fn hit(addr: u32, word: u32) -> DataResponse {
    DataResponse::HitComplete { addr, word }
}

// ══════════════════════════════════════════════════════════
// 1. Lane service
// ══════════════════════════════════════════════════════════

#[test]
fn lanes_are_served_one_request_at_a_time() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE, HEAP_BASE + 4]));
    assert_eq!(b.step(), None);
    assert_eq!(b.lsu.queue_len(), 1);

    let first = b.step().unwrap();
    assert_eq!(first, DataRequest { addr: HEAP_BASE, size: 4, store: None });
    b.resp.send(hit(HEAP_BASE, 0x11));
    let second = b.step().unwrap();
    assert_eq!(second.addr, HEAP_BASE + 4);
    b.resp.send(hit(HEAP_BASE + 4, 0x22));
    assert_eq!(b.step(), None);

    let done = b.lsu.pop_wb().unwrap();
    assert_eq!(&done.wdat[..2], &[0x11, 0x22]);
    assert!(b.lsu.is_idle());
}

#[test]
fn one_hit_completes_every_lane_on_the_word() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE, HEAP_BASE, HEAP_BASE]));
    let _ = b.step();
    let _ = b.step().unwrap();
    b.resp.send(hit(HEAP_BASE, 9));
    assert_eq!(b.step(), None);
    assert_eq!(b.lsu.peek_wb().unwrap().wdat[..3], [9, 9, 9]);
}

#[test]
fn sub_word_loads_sign_extend() {
    let mut b = Bench::new();
    let raw = asm().lb(5, 1, 0).build();
    b.dispatch.send(mem_inst(raw, 0b11, &[HEAP_BASE + 1, HEAP_BASE + 2]));
    let _ = b.step();
    let req = b.step().unwrap();
    assert_eq!(req.size, 1);
    b.resp.send(hit(HEAP_BASE + 1, 0x0080_FF00));
    let _ = b.step();
    assert_eq!(&b.lsu.pop_wb().unwrap().wdat[..2], &[0xFFFF_FFFF, 0xFFFF_FF80]);
}

#[test]
fn miss_parks_every_lane_in_the_block() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE, HEAP_BASE + 0x40, HEAP_BASE + 0x80]));
    let _ = b.step();
    let _ = b.step().unwrap();

    b.resp.send(DataResponse::MissAccepted { addr: HEAP_BASE });
    let other = b.step().unwrap();
    assert_eq!(other.addr, HEAP_BASE + 0x80);
    b.resp.send(hit(HEAP_BASE + 0x80, 3));
    assert_eq!(b.step(), None);

    b.resp.send(DataResponse::MissComplete { block: HEAP_BASE });
    assert_eq!(b.step().unwrap().addr, HEAP_BASE);
}

#[test]
fn stall_retries_the_same_lane() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE]));
    let _ = b.step();
    let first = b.step().unwrap();
    b.req.send(first);
    b.resp.send(DataResponse::HitStall);
    b.tick().unwrap();
    assert_eq!(b.req.pop(), Some(first));
    b.resp.send(hit(HEAP_BASE, 1));
    let _ = b.step();
    assert!(b.lsu.peek_wb().is_some());
}

#[test]
fn store_lanes_finish_on_accept() {
    let mut b = Bench::new();
    let raw = asm().sw(2, 1, 0).build();
    b.dispatch.send(mem_inst(raw, 0b1, &[HEAP_BASE]));
    let _ = b.step();
    let req = b.step().unwrap();
    assert_eq!(req.store, Some(0xA0));
    b.resp.send(DataResponse::MissAccepted { addr: HEAP_BASE });
    let _ = b.step();
    assert!(b.lsu.pop_wb().is_some());
}

#[test]
fn halt_passes_straight_through() {
    let mut b = Bench::new();
    b.dispatch.send(mem_inst(asm().halt().build(), u32::MAX, &[]));
    let _ = b.step();
    assert_eq!(b.step(), None);
    assert!(b.lsu.pop_wb().is_some());
}

// ══════════════════════════════════════════════════════════
// 2. Ordering and back-pressure
// ══════════════════════════════════════════════════════════

#[test]
fn store_waits_for_older_loads() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE]));
    let _ = b.step();
    b.dispatch.send(mem_inst(asm().sw(2, 1, 0).build(), 0b1, &[HEAP_BASE + 0x100]));
    assert_eq!(b.step().unwrap().addr, HEAP_BASE);

    b.resp.send(DataResponse::MissAccepted { addr: HEAP_BASE });
    assert_eq!(b.step(), None);
    assert_eq!(b.lsu.queue_len(), 2);
}

#[test]
fn load_may_pass_an_older_parked_load() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE]));
    let _ = b.step();
    b.dispatch.send(load(&[HEAP_BASE + 0x100]));
    let _ = b.step().unwrap();
    b.resp.send(DataResponse::MissAccepted { addr: HEAP_BASE });
    assert_eq!(b.step().unwrap().addr, HEAP_BASE + 0x100);
}

#[test]
fn older_store_lanes_are_served_first() {
    let mut b = Bench::new();
    b.dispatch.send(mem_inst(asm().sw(2, 1, 0).build(), 0b11, &[HEAP_BASE, HEAP_BASE + 4]));
    let _ = b.step();
    b.dispatch.send(load(&[HEAP_BASE + 0x100]));
    assert_eq!(b.step().unwrap().addr, HEAP_BASE);
    b.resp.send(hit(HEAP_BASE, 0));
    assert_eq!(b.step().unwrap().addr, HEAP_BASE + 4);
}

#[test]
fn full_queue_applies_back_pressure() {
    let mut config = small_config(2);
    config.lsu.queue_size = 1;
    let mut b = Bench::with_config(&config);
    b.dispatch.send(load(&[HEAP_BASE]));
    let _ = b.step();
    b.dispatch.send(load(&[HEAP_BASE + 4]));
    let _ = b.step();
    assert!(b.dispatch.is_valid());
    assert_eq!(b.stats.lsu_backpressure, 1);
}

#[test]
fn wb_buffer_limits_retirement() {
    let mut b = Bench::new();
    b.dispatch.send(mem_inst(asm().halt().build(), u32::MAX, &[]));
    let _ = b.step();
    b.dispatch.send(mem_inst(asm().halt().build(), u32::MAX, &[]));
    let _ = b.step();
    let _ = b.step();
    assert_eq!(b.lsu.queue_len(), 1);
    assert!(b.lsu.pop_wb().is_some());
    let _ = b.step();
    assert!(b.lsu.pop_wb().is_some());
}

// ══════════════════════════════════════════════════════════
// 3. Address map
// ══════════════════════════════════════════════════════════

#[test]
fn mmio_lanes_read_zero_without_touching_the_cache() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[0x10, 0x14]));
    assert_eq!(b.step(), None);
    assert_eq!(b.step(), None);
    assert_eq!(b.lsu.pop_wb().unwrap().wdat[..2], [0, 0]);
}

#[test]
fn unmapped_address_aborts() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[0x0200_0000]));
    assert_eq!(
        b.tick(),
        Err(MemoryError::Unmapped {
            addr: 0x0200_0000,
            size: 4
        })
    );
}

#[test]
fn misaligned_address_aborts() {
    let mut b = Bench::new();
    b.dispatch.send(load(&[HEAP_BASE + 2]));
    assert_eq!(
        b.tick(),
        Err(MemoryError::Misaligned {
            addr: HEAP_BASE + 2,
            size: 4
        })
    );
}

#[test]
fn store_to_program_text_aborts() {
    let mut b = Bench::new();
    b.dispatch.send(mem_inst(asm().sw(2, 1, 0).build(), 0b1, &[0x1000]));
    assert_eq!(b.tick(), Err(MemoryError::InstrWrite { addr: 0x1000 }));
}

#[test]
fn tolerated_out_of_range_lanes_are_dropped() {
    let mut config = small_config(2);
    config.memory.allow_oob = true;
    let mut b = Bench::with_config(&config);
    b.dispatch.send(load(&[0x0200_0000]));
    assert_eq!(b.step(), None);
    assert_eq!(b.step(), None);
    assert_eq!(b.lsu.pop_wb().unwrap().wdat[0], 0);
}
