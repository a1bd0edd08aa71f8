//! Execution units and the memory-side components of the core.
//!
//! This module contains the lane arithmetic of every functional unit class,
//! the pipelined unit wrapper that gives them latency, the load/store unit,
//! and the two L1 caches.

/// Integer lane arithmetic (ALU, integer multiply, integer divide).
pub mod alu;

/// Compares, jumps and predicate moves.
pub mod bru;

/// Lockup-free instruction and data caches.
pub mod cache;

/// Single-precision lane arithmetic.
pub mod fpu;

/// Pipelined functional unit with latency and an output buffer.
pub mod functional;

/// Load/Store Unit for warp-wide memory access.
pub mod lsu;

pub use functional::FunctionalUnit;
pub use lsu::LoadStoreUnit;
