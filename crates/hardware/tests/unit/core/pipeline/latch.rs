//! Latch and forwarding link handshakes.

use proptest::prelude::*;
use simt_core::core::pipeline::latch::{ForwardingIf, Latch};

#[test]
fn push_pop_snoop() {
    let mut latch = Latch::new("test");
    assert!(latch.ready_for_push());
    assert!(!latch.is_valid());
    assert_eq!(latch.push(5), Ok(()));
    assert!(latch.is_valid());
    assert_eq!(latch.snoop(), Some(&5));
    assert_eq!(latch.pop(), Some(5));
    assert_eq!(latch.pop(), None);
}

#[test]
fn full_latch_hands_the_value_back() {
    let mut latch = Latch::new("test");
    latch.send(1);
    assert_eq!(latch.push(2), Err(2));
    assert_eq!(latch.snoop(), Some(&1));
}

#[test]
#[should_panic(expected = "push into full latch `decode_issue`")]
fn send_into_full_latch_is_a_protocol_violation() {
    let mut latch = Latch::new("decode_issue");
    latch.send(1);
    latch.send(2);
}

#[test]
fn gated_push_respects_the_link_wait() {
    let mut latch = Latch::new("fetch");
    let mut link: ForwardingIf<bool> = ForwardingIf::new("icache_hit");
    link.set_wait(true);
    assert!(!latch.ready_for_push_gated(&link));
    assert_eq!(latch.push_gated(7, &link), Err(7));
    link.set_wait(false);
    assert!(latch.ready_for_push_gated(&link));
    assert_eq!(latch.push_gated(7, &link), Ok(()));
}

#[test]
fn link_payload_and_wait_are_independent() {
    let mut link = ForwardingIf::new("link");
    link.set_wait(true);
    assert_eq!(link.push(3), Ok(()));
    assert_eq!(link.push(4), Err(4));
    link.force_push(5);
    assert_eq!(link.pop(), Some(5));
    assert!(link.is_waiting());
    link.clear();
    assert!(!link.is_waiting());
}

#[test]
#[should_panic(expected = "signal overwritten")]
fn link_send_over_unconsumed_payload_panics() {
    let mut link = ForwardingIf::new("decode_signal");
    link.send(1);
    link.send(2);
}

proptest! {
    /// A latch holds at most one value: after any sequence of pushes and pops
    /// it yields exactly the first value pushed since the last pop.
    #[test]
    fn single_slot(ops in prop::collection::vec(prop::option::of(any::<u8>()), 1..64)) {
        let mut latch = Latch::new("prop");
        let mut model: Option<u8> = None;
        for op in ops {
            match op {
                Some(v) => {
                    let accepted = latch.push(v).is_ok();
                    prop_assert_eq!(accepted, model.is_none());
                    if accepted {
                        model = Some(v);
                    }
                }
                None => prop_assert_eq!(latch.pop(), model.take()),
            }
        }
    }
}
