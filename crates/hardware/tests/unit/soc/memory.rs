//! Backing store and address policy.

use rstest::rstest;
use simt_core::common::{AddressSpace, MemoryError};
use simt_core::soc::Memory;
use simt_core::soc::memory::{AccessPolicy, Route};

#[test]
fn unwritten_memory_reads_zero() {
    let memory = Memory::new();
    assert_eq!(memory.read_word(0x1000_0000), 0);
    assert!(!memory.was_written(0x1000_0000));
}

#[test]
fn words_are_little_endian_and_aligned() {
    let mut memory = Memory::new();
    memory.write_word(0x1000_0006, 0x1122_3344);
    assert_eq!(memory.read_word(0x1000_0004), 0x1122_3344);
    assert!(memory.was_written(0x1000_0005));
}

#[test]
fn blocks_span_pages() {
    let mut memory = Memory::new();
    memory.write_block(0x1000_0FF8, &[1, 2, 3, 4]);
    assert_eq!(memory.read_block(0x1000_0FF8, 4), vec![1, 2, 3, 4]);
}

#[test]
fn place_rejects_mmio_and_unaligned() {
    let mut memory = Memory::new();
    assert!(memory.place(0x1000, 7).is_ok());
    assert_eq!(memory.read_word(0x1000), 7);
    assert_eq!(
        memory.place(0x10, 1),
        Err(MemoryError::Unmapped { addr: 0x10, size: 4 })
    );
    assert_eq!(
        memory.place(0x1002, 1),
        Err(MemoryError::Misaligned { addr: 0x1002, size: 4 })
    );
}

#[test]
fn words_lists_touched_pages_only() {
    let mut memory = Memory::new();
    memory.write_word(0x1000_0010, 5);
    let words: Vec<(u32, u32)> = memory.words().filter(|&(_, w)| w != 0).collect();
    assert_eq!(words, vec![(0x1000_0010, 5)]);
    assert_eq!(memory.words().count(), 1024);
}

#[rstest]
#[case(0x1000_0000, 4, false, Ok(Route::Memory(AddressSpace::Heap)))]
#[case(0x0000_0010, 4, true, Ok(Route::Mmio))]
#[case(0x2000, 4, false, Ok(Route::Memory(AddressSpace::Instr)))]
#[case(0x2000, 4, true, Err(MemoryError::InstrWrite { addr: 0x2000 }))]
#[case(0x1000_0001, 2, false, Err(MemoryError::Misaligned { addr: 0x1000_0001, size: 2 }))]
#[case(0x0200_0000, 4, false, Err(MemoryError::Unmapped { addr: 0x0200_0000, size: 4 }))]
fn strict_policy(
    #[case] addr: u32,
    #[case] size: u32,
    #[case] write: bool,
    #[case] expected: Result<Route, MemoryError>,
) {
    assert_eq!(AccessPolicy::default().check(addr, size, write), expected);
}

#[test]
fn relaxed_policy() {
    let policy = AccessPolicy {
        allow_oob: true,
        allow_instr_writes: true,
    };
    assert_eq!(policy.check(0x0200_0000, 4, false), Ok(Route::Discard));
    assert_eq!(
        policy.check(0x2000, 4, true),
        Ok(Route::Memory(AddressSpace::Instr))
    );
}
