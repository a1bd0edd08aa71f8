//! Memory response demultiplexer.
//!
//! Routes the controller's output to the instruction or data cache response
//! latch by source tag. A response whose destination latch is full stays in
//! the controller output, which in turn stalls the controller.

use super::{MemResponse, Source};
use crate::core::pipeline::latch::Latch;

/// Routes memory responses by source.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemRespDemux;

impl MemRespDemux {
    /// Creates the demux.
    pub const fn new() -> Self {
        Self
    }

    /// Runs one cycle.
    ///
    /// # Returns
    ///
    /// The source a response was delivered to, if any.
    pub fn tick(
        &self,
        input: &mut Latch<MemResponse>,
        ic: &mut Latch<MemResponse>,
        dc: &mut Latch<MemResponse>,
    ) -> Option<Source> {
        let src = input.snoop()?.src;
        let target = match src {
            Source::ICache => ic,
            Source::DCache => dc,
        };
        if !target.ready_for_push() {
            return None;
        }
        let resp = input.pop()?;
        target.send(resp);
        Some(src)
    }
}
