//! Memory interconnect between the caches and the memory controller.
//!
//! This module defines the block-level transactions and the two routing
//! components around the controller. It provides:
//! 1. **Transactions:** Block reads and write-backs issued by the caches.
//! 2. **Arbiter:** Picks one cache request per cycle and tags it with its source.
//! 3. **Demux:** Steers each controller response back to the cache that asked.

/// Request arbitration.
pub mod arbiter;

/// Response routing.
pub mod demux;

pub use arbiter::MemArbiter;
pub use demux::MemRespDemux;

/// Requester of a memory transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// Instruction cache.
    ICache,
    /// Data cache.
    DCache,
}

/// What a transaction does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemOp {
    /// Read `words` consecutive words.
    Read {
        /// Block length in words.
        words: usize,
    },
    /// Write a block back.
    Write {
        /// Block contents.
        data: Vec<u32>,
    },
}

/// A block transaction issued by a cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemRequest {
    /// Block-aligned address.
    pub addr: u32,
    /// Operation.
    pub op: MemOp,
}

impl MemRequest {
    /// A block read.
    pub const fn read(addr: u32, words: usize) -> Self {
        Self {
            addr,
            op: MemOp::Read { words },
        }
    }

    /// A block write-back.
    pub const fn write(addr: u32, data: Vec<u32>) -> Self {
        Self {
            addr,
            op: MemOp::Write { data },
        }
    }
}

/// A request after arbitration, tagged with its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedRequest {
    /// Requester.
    pub src: Source,
    /// The transaction.
    pub req: MemRequest,
}

/// Completion data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemReply {
    /// Block contents for a read.
    Data(Vec<u32>),
    /// A write-back has been committed.
    WriteDone,
}

/// A completed transaction on its way back to the requester.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemResponse {
    /// Requester.
    pub src: Source,
    /// Block address of the request.
    pub addr: u32,
    /// Completion data.
    pub reply: MemReply,
}
