//! Fixed-latency memory controller.
//!
//! Every accepted request completes exactly `latency` cycles later. Each cycle:
//! 1. **Age:** Every in-flight request counts down by one.
//! 2. **Complete:** The oldest expired request is serviced, if the output latch
//!    can take its response. A full output stalls the controller.
//! 3. **Accept:** Only in a cycle with no expired request, one new request is accepted.
//!
//! Reads return the block; writes commit it to memory and return `WriteDone`.
//! This is the only component that mutates memory during a run.

use std::collections::VecDeque;

use tracing::trace;

use super::Memory;
use crate::core::pipeline::latch::Latch;
use crate::soc::interconnect::{MemOp, MemReply, MemResponse, TaggedRequest};

#[derive(Clone, Debug)]
struct InFlight {
    req: TaggedRequest,
    remaining: u64,
}

/// Fixed-latency memory controller.
#[derive(Clone, Debug)]
pub struct MemController {
    latency: u64,
    inflight: VecDeque<InFlight>,
}

/// What the controller did in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerActivity {
    /// A request was completed.
    pub completed: bool,
    /// A new request was accepted.
    pub accepted: bool,
    /// An expired request could not be delivered.
    pub stalled: bool,
}

impl MemController {
    /// Creates a controller with the given service latency in cycles.
    pub const fn new(latency: u64) -> Self {
        Self {
            latency,
            inflight: VecDeque::new(),
        }
    }

    /// Requests accepted but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    /// Returns `true` when nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.inflight.is_empty()
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `input` - Arbiter output latch.
    /// * `output` - Response latch read by the demux.
    /// * `memory` - Backing store.
    pub fn tick(
        &mut self,
        input: &mut Latch<TaggedRequest>,
        output: &mut Latch<MemResponse>,
        memory: &mut Memory,
    ) -> ControllerActivity {
        let mut activity = ControllerActivity::default();
        for entry in &mut self.inflight {
            entry.remaining = entry.remaining.saturating_sub(1);
        }

        if let Some(idx) = self.inflight.iter().position(|e| e.remaining == 0) {
            if !output.ready_for_push() {
                activity.stalled = true;
                return activity;
            }
            if let Some(InFlight { req, .. }) = self.inflight.remove(idx) {
                let TaggedRequest { src, req } = req;
                let reply = match req.op {
                    MemOp::Read { words } => MemReply::Data(memory.read_block(req.addr, words)),
                    MemOp::Write { data } => {
                        memory.write_block(req.addr, &data);
                        MemReply::WriteDone
                    }
                };
                trace!(?src, addr = format_args!("{:#010x}", req.addr), "memory complete");
                output.send(MemResponse {
                    src,
                    addr: req.addr,
                    reply,
                });
                activity.completed = true;
            }
            return activity;
        }

        if let Some(req) = input.pop() {
            trace!(src = ?req.src, addr = format_args!("{:#010x}", req.req.addr), "memory accept");
            self.inflight.push_back(InFlight {
                req,
                remaining: self.latency,
            });
            activity.accepted = true;
        }
        activity
    }
}
