//! Common types and constants shared by every simulator component.
//!
//! This module provides fundamental building blocks used across the crate. It includes:
//! 1. **Address Map:** The fixed MMIO, instruction, args, heap and stack regions.
//! 2. **Constants:** Warp topology, instruction field layout, sentinel values.
//! 3. **Error Handling:** Memory, load, configuration and top-level simulator errors.
//! 4. **Lane Masks:** Per-lane activity bitmaps for predicated execution.

/// Address map regions and access classification.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types.
pub mod error;

/// Per-lane activity masks.
pub mod lanes;

pub use addr::AddressSpace;
pub use error::{ConfigError, LoadError, MemoryError, SimError};
pub use lanes::{LaneMask, LaneWords};
