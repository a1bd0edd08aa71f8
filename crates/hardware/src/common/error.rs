//! Simulator Error Types.
//!
//! This module defines the recoverable failures of a simulation run. It provides:
//! 1. **Memory Errors:** Accesses outside the address map, across regions, misaligned,
//!    or writing program text.
//! 2. **Load Errors:** Malformed program or data images and I/O failures.
//! 3. **Configuration Errors:** Geometry that cannot be built.
//! 4. **Top-level Error:** `SimError`, returned from every fallible simulator entry point.
//!
//! Handshake protocol violations are not represented here; they are assertion
//! failures inside the latch primitives.

use std::io;
use std::path::PathBuf;

use super::addr::AddressSpace;

/// A memory access the address map rejects.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The access starts outside every region.
    #[error("unmapped access of {size} bytes at {addr:#010x}")]
    Unmapped {
        /// First byte of the access.
        addr: u32,
        /// Access width in bytes.
        size: u32,
    },

    /// The access starts in one region and ends in another.
    #[error("access of {size} bytes at {addr:#010x} crosses the end of the {space} region")]
    SpansRegions {
        /// First byte of the access.
        addr: u32,
        /// Access width in bytes.
        size: u32,
        /// Region holding the first byte.
        space: AddressSpace,
    },

    /// A store targets program text.
    #[error("write to instruction memory at {addr:#010x}")]
    InstrWrite {
        /// Store address.
        addr: u32,
    },

    /// The address is not a multiple of the access width.
    #[error("misaligned {size}-byte access at {addr:#010x}")]
    Misaligned {
        /// Access address.
        addr: u32,
        /// Access width in bytes.
        size: u32,
    },
}

/// A program or data image that cannot be loaded.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A line does not match the expected word format.
    #[error("line {line}: {reason}: `{text}`")]
    BadLine {
        /// 1-based line number.
        line: usize,
        /// The offending line after comment stripping.
        text: String,
        /// What was expected.
        reason: &'static str,
    },

    /// A word lands somewhere the address map rejects.
    #[error("line {line}: {source}")]
    Placement {
        /// 1-based line number.
        line: usize,
        /// Address map failure.
        source: MemoryError,
    },
}

/// A configuration the simulator cannot be built from.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The JSON text is malformed or has wrongly typed fields.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A structural parameter is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Top-level simulator error.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A memory access was rejected.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// An image could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The run did not halt within the cycle budget.
    #[error("no halt after {cycles} cycles")]
    StepLimit {
        /// Cycles simulated before giving up.
        cycles: u64,
    },
}
