//! Memory-side components of the SIMT core.
//!
//! This module organizes everything below the caches: the request arbiter
//! and response demux, the fixed-latency memory controller, and the sparse
//! backing store with its address-map checks.

/// Cache-to-controller interconnect (transactions, arbiter, demux).
pub mod interconnect;

/// Backing store, address-map checks and the memory controller.
pub mod memory;

pub use interconnect::{MemArbiter, MemRespDemux};
pub use memory::Memory;
pub use memory::controller::MemController;
