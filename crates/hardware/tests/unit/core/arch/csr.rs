//! Per-lane CSR storage.

use simt_core::common::LaneMask;
use simt_core::common::constants::CSR_THREAD_ID;
use simt_core::core::arch::CsrFile;

#[test]
fn thread_id_is_global() {
    let csrs = CsrFile::new();
    let ids = csrs.read(3, CSR_THREAD_ID);
    assert_eq!(ids[0], 96);
    assert_eq!(ids[31], 127);
}

#[test]
fn thread_id_ignores_writes() {
    let mut csrs = CsrFile::new();
    csrs.write(0, CSR_THREAD_ID, &[9; 32], LaneMask::ALL);
    assert_eq!(csrs.read(0, CSR_THREAD_ID)[5], 5);
}

#[test]
fn plain_csrs_store_active_lanes() {
    let mut csrs = CsrFile::new();
    assert_eq!(csrs.read(1, 12), [0; 32]);
    csrs.write(1, 12, &[7; 32], LaneMask::from_bits(0b10));
    let values = csrs.read(1, 12);
    assert_eq!(values[0], 0);
    assert_eq!(values[1], 7);
    assert_eq!(csrs.read(0, 12), [0; 32]);
}
