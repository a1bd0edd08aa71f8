//! Core processor implementation.
//!
//! This module contains the SIMT core: architectural state, the instruction
//! pipeline, the execution units and caches, and the `Sm` that wires them
//! together and steps them cycle by cycle.

/// Architectural state (registers, predicates, CSRs).
pub mod arch;

/// Instruction pipeline (scheduler, stages, latches, signals).
pub mod pipeline;

/// Streaming multiprocessor: component wiring and the cycle loop.
pub mod sm;

/// Execution units (ALU, FPU, branch, load/store, caches).
pub mod units;

pub use self::sm::Sm;
