//! Register dependency scoreboard.

use simt_core::core::pipeline::scoreboard::Scoreboard;
use simt_core::isa::decode;

use crate::common::builder::instruction::asm;

#[test]
fn raw_hazard_blocks_until_release() {
    let mut sb = Scoreboard::new(2);
    let producer = decode(asm().lw(5, 1, 0).build());
    let consumer = decode(asm().add(6, 5, 2).build());
    assert!(sb.can_issue(0, &producer));
    sb.reserve(0, &producer);
    assert!(sb.is_pending(0, 5));
    assert!(!sb.can_issue(0, &consumer));
    sb.release(0, &producer);
    assert!(sb.can_issue(0, &consumer));
    assert!(sb.is_idle());
}

#[test]
fn waw_hazard_blocks() {
    let mut sb = Scoreboard::new(1);
    sb.reserve(0, &decode(asm().mul(3, 1, 2).build()));
    assert!(!sb.can_issue(0, &decode(asm().addi(3, 0, 1).build())));
}

#[test]
fn warps_are_tracked_separately() {
    let mut sb = Scoreboard::new(2);
    sb.reserve(0, &decode(asm().addi(4, 0, 1).build()));
    assert!(sb.can_issue(1, &decode(asm().add(5, 4, 4).build())));
}

#[test]
fn x0_is_never_pending() {
    let mut sb = Scoreboard::new(1);
    sb.reserve(0, &decode(asm().addi(0, 0, 1).build()));
    assert!(!sb.is_pending(0, 0));
    assert!(sb.is_idle());
}

#[test]
fn partial_immediate_waits_on_its_own_destination() {
    let mut sb = Scoreboard::new(1);
    sb.reserve(0, &decode(asm().lui(7, 0x10).build()));
    assert!(!sb.can_issue(0, &decode(asm().lli(7, 0x20).build())));
}

#[test]
fn stores_have_no_destination() {
    let mut sb = Scoreboard::new(1);
    sb.reserve(0, &decode(asm().sw(3, 4, 0).build()));
    assert!(sb.is_idle());
}
