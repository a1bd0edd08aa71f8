//! Memory request arbiter.
//!
//! Two caches share one controller port. Each cycle the arbiter grants at
//! most one pending request, and only when the controller's input latch can
//! take it, so a refused grant never loses a request.

use tracing::trace;

use super::{MemRequest, Source, TaggedRequest};
use crate::config::ArbiterPolicy;
use crate::core::pipeline::latch::Latch;

/// Grants one cache request per cycle.
#[derive(Debug, Clone)]
pub struct MemArbiter {
    policy: ArbiterPolicy,
    /// Source preferred on the next contested cycle (round-robin only).
    favor: Source,
}

impl MemArbiter {
    /// Creates an arbiter; round-robin starts by favoring the instruction cache.
    pub const fn new(policy: ArbiterPolicy) -> Self {
        Self {
            policy,
            favor: Source::ICache,
        }
    }

    /// Source that would win if both caches were requesting.
    pub const fn favored(&self) -> Source {
        match self.policy {
            ArbiterPolicy::IcachePriority => Source::ICache,
            ArbiterPolicy::RoundRobin => self.favor,
        }
    }

    /// Runs one cycle.
    ///
    /// # Arguments
    ///
    /// * `ic` - Instruction cache request latch.
    /// * `dc` - Data cache request latch.
    /// * `out` - Controller input latch.
    ///
    /// # Returns
    ///
    /// The source granted this cycle, if any.
    pub fn tick(
        &mut self,
        ic: &mut Latch<MemRequest>,
        dc: &mut Latch<MemRequest>,
        out: &mut Latch<TaggedRequest>,
    ) -> Option<Source> {
        if !out.ready_for_push() {
            return None;
        }
        let first = self.favored();
        let order = match first {
            Source::ICache => [Source::ICache, Source::DCache],
            Source::DCache => [Source::DCache, Source::ICache],
        };
        for src in order {
            let latch = match src {
                Source::ICache => &mut *ic,
                Source::DCache => &mut *dc,
            };
            if let Some(req) = latch.pop() {
                trace!(?src, addr = format_args!("{:#010x}", req.addr), "arbiter grant");
                out.send(TaggedRequest { src, req });
                if self.policy == ArbiterPolicy::RoundRobin {
                    self.favor = match src {
                        Source::ICache => Source::DCache,
                        Source::DCache => Source::ICache,
                    };
                }
                return Some(src);
            }
        }
        None
    }
}
