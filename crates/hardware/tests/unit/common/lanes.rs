//! Lane mask operations.

use proptest::prelude::*;
use simt_core::common::LaneMask;

#[test]
fn constants() {
    assert!(LaneMask::ALL.all());
    assert_eq!(LaneMask::ALL.count(), 32);
    assert!(!LaneMask::NONE.any());
    assert_eq!(LaneMask::NONE.first(), None);
}

#[test]
fn set_get_and_iterate() {
    let mut mask = LaneMask::NONE;
    mask.set(3, true);
    mask.set(31, true);
    assert!(mask.get(3));
    assert!(!mask.get(4));
    assert_eq!(mask.first(), Some(3));
    assert_eq!(mask.iter().collect::<Vec<_>>(), vec![3, 31]);
    mask.set(3, false);
    assert_eq!(mask.bits(), 1 << 31);
}

#[test]
fn from_fn_matches_predicate() {
    let even = LaneMask::from_fn(|lane| lane % 2 == 0);
    assert_eq!(even.bits(), 0x5555_5555);
    assert_eq!((!even).bits(), 0xAAAA_AAAA);
    assert_eq!(even & !even, LaneMask::NONE);
    assert_eq!(even | !even, LaneMask::ALL);
}

proptest! {
    #[test]
    fn count_matches_iteration(bits in any::<u32>()) {
        let mask = LaneMask::from_bits(bits);
        prop_assert_eq!(mask.iter().count() as u32, mask.count());
        prop_assert_eq!(LaneMask::from_fn(|lane| mask.get(lane)), mask);
    }
}
