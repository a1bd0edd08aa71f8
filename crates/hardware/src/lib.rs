//! SIMT warp processor simulator library.
//!
//! This crate implements a cycle-accurate model of a SIMT core with the following:
//! 1. **Core:** Warp scheduler, decode, issue, pipelined functional units and writeback,
//!    with per-lane registers, predicate masks and CSRs.
//! 2. **Memory:** Lockup-free instruction cache, banked write-back data cache with a
//!    coalescing load/store unit, arbiter and fixed-latency memory controller.
//! 3. **ISA:** Decoding of the fixed 32-bit instruction encoding and packet classification.
//! 4. **Simulation:** Image loader, memory dumps, configuration and statistics.
//!
//! # Examples
//!
//! ```
//! use simt_core::{Config, Simulator};
//! use simt_core::sim::ImageFormat;
//!
//! let mut config = Config::default();
//! config.general.warp_count = 2;
//! let mut sim = Simulator::new(&config).unwrap();
//! // halt
//! sim.load_program("0000007F", ImageFormat::Hex, config.general.start_pc).unwrap();
//! let cycles = sim.run_until_halt().unwrap();
//! assert!(cycles > 0);
//! assert_eq!(sim.stats().instructions_retired, 2);
//! ```

/// Common types and constants (address map, lane masks, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// SIMT core (architectural state, pipeline, units, cycle loop).
pub mod core;
/// Instruction set (encoding, decode, operations, disassembly).
pub mod isa;
/// Simulation driver, loader and dumps.
pub mod sim;
/// Memory side (interconnect, controller, backing store).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Top-level error type.
pub use crate::common::SimError;
/// Main simulator type; owns the core, caches, memory and stats.
pub use crate::sim::Simulator;
