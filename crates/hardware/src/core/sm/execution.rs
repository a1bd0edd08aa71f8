//! Main Execution Loop.
//!
//! One call to [`Sm::tick`] advances every component by one cycle. Stages run
//! from the back of the pipeline to the front, so a value a stage pushes this
//! cycle is only seen by its consumer on the next one, while feedback computed
//! from last cycle's state reaches the scheduler, which runs last.

use tracing::debug;

use super::Sm;
use crate::common::SimError;
use crate::soc::interconnect::Source;

impl Sm {
    /// Advances the core by one cycle.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Memory` when a data access violates the address map.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.stats.cycles += 1;

        self.writeback.tick(
            &mut self.execute,
            &mut self.arch,
            &mut self.scoreboard,
            &mut self.links.writeback,
            &mut self.stats,
        );

        self.execute.tick(
            &mut self.dispatch,
            &mut self.lsu_req,
            &mut self.lsu_resp,
            &mut self.links.branch,
            &mut self.stats,
        )?;

        self.dcache.tick(
            &mut self.lsu_req,
            &mut self.lsu_resp,
            &mut self.dc_mem_req,
            &mut self.dc_mem_resp,
            &mut self.stats,
        );

        self.issue.tick(
            &mut self.decoded,
            &mut self.dispatch,
            &mut self.links.issue,
            &mut self.scoreboard,
            &self.arch,
            &mut self.stats,
        );

        self.decode.tick(
            &mut self.fetched,
            &mut self.decoded,
            &mut self.links,
            &self.arch.preds,
            &mut self.stats,
        );

        self.icache.tick(
            &mut self.fetch,
            &mut self.fetched,
            &mut self.links.icache,
            &mut self.ic_mem_req,
            &mut self.ic_mem_resp,
            &mut self.stats,
        );

        let _ = self
            .demux
            .tick(&mut self.mem_resp, &mut self.ic_mem_resp, &mut self.dc_mem_resp);

        let activity = self
            .controller
            .tick(&mut self.mem_req, &mut self.mem_resp, &mut self.memory);
        if activity.stalled {
            self.stats.mem_stalls += 1;
        }

        match self
            .arbiter
            .tick(&mut self.ic_mem_req, &mut self.dc_mem_req, &mut self.mem_req)
        {
            Some(Source::ICache) => self.stats.mem_requests_icache += 1,
            Some(Source::DCache) => self.stats.mem_requests_dcache += 1,
            None => {}
        }

        let fetched = self.scheduler.tick(&mut self.fetch, &mut self.links, &mut self.stats);

        if self.trace {
            self.trace_cycle(fetched.is_sentinel());
        }
        Ok(())
    }

    /// Emits a one-line occupancy snapshot of the pipeline.
    fn trace_cycle(&self, bubble: bool) {
        let busy_units: Vec<&str> = self
            .execute
            .units()
            .iter()
            .filter(|u| !u.is_idle())
            .map(|u| u.kind().name())
            .collect();
        debug!(
            cycle = self.stats.cycles,
            bubble,
            fetched = self.fetched.is_valid(),
            decoded = self.decoded.is_valid(),
            units = ?busy_units,
            lsu = self.execute.lsu.queue_len(),
            icache_misses = self.icache.outstanding_misses(),
            dcache_misses = self.dcache.outstanding_misses(),
            mem_in_flight = self.controller.in_flight(),
            retired = self.stats.instructions_retired,
            "cycle"
        );
    }
}
