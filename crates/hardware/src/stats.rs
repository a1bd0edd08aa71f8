//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the SIMT simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions and lanes, derived IPC.
//! 2. **Front end:** Fetches, scheduler bubbles, squashed over-fetch, packet redirects.
//! 3. **Back end:** Dispatches, scoreboard stalls, per-unit activity, LSU back-pressure.
//! 4. **Memory hierarchy:** Hit/miss/merge counts for both caches and controller traffic.

use std::time::Instant;

use crate::isa::FuKind;

/// Number of functional unit classes tracked in `unit_ops`.
pub const UNIT_COUNT: usize = 10;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,

    /// Warp fetches issued by the scheduler.
    pub fetches: u64,
    /// Cycles the scheduler emitted a bubble instead of a fetch.
    pub scheduler_bubbles: u64,
    /// Instructions decoded and passed to issue.
    pub decoded: u64,
    /// Fetches past a packet end dropped at decode.
    pub squashed: u64,
    /// Redirects applied to warp-groups.
    pub redirects: u64,
    /// Barrier releases.
    pub barrier_releases: u64,

    /// Instructions dispatched to a unit.
    pub dispatched: u64,
    /// Cycles a ready buffer head was held back by the scoreboard.
    pub scoreboard_stalls: u64,
    /// Instructions retired at writeback.
    pub instructions_retired: u64,
    /// Active lanes retired at writeback.
    pub lanes_retired: u64,
    /// Instructions accepted per unit, indexed by `FuKind::index`.
    pub unit_ops: [u64; UNIT_COUNT],

    /// Instruction cache hits.
    pub icache_hits: u64,
    /// Instruction cache primary misses.
    pub icache_misses: u64,
    /// Instruction cache misses merged into an outstanding fill.
    pub icache_merged: u64,
    /// Cycles a fetch waited in its latch for a free miss entry.
    pub icache_stalls: u64,

    /// Data cache hits.
    pub dcache_hits: u64,
    /// Data cache primary misses.
    pub dcache_misses: u64,
    /// Data cache misses merged into an outstanding fill.
    pub dcache_merged: u64,
    /// Requests answered with HIT_STALL.
    pub dcache_hit_stalls: u64,
    /// Dirty lines written back.
    pub dcache_writebacks: u64,

    /// Cycles the LSU queue was full with a request waiting.
    pub lsu_backpressure: u64,
    /// Memory requests granted to the instruction cache.
    pub mem_requests_icache: u64,
    /// Memory requests granted to the data cache.
    pub mem_requests_dcache: u64,
    /// Cycles the controller held a finished request it could not deliver.
    pub mem_stalls: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            fetches: 0,
            scheduler_bubbles: 0,
            decoded: 0,
            squashed: 0,
            redirects: 0,
            barrier_releases: 0,
            dispatched: 0,
            scoreboard_stalls: 0,
            instructions_retired: 0,
            lanes_retired: 0,
            unit_ops: [0; UNIT_COUNT],
            icache_hits: 0,
            icache_misses: 0,
            icache_merged: 0,
            icache_stalls: 0,
            dcache_hits: 0,
            dcache_misses: 0,
            dcache_merged: 0,
            dcache_hit_stalls: 0,
            dcache_writebacks: 0,
            lsu_backpressure: 0,
            mem_requests_icache: 0,
            mem_requests_dcache: 0,
            mem_stalls: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"frontend"`, `"backend"`, `"memory"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "frontend", "backend", "memory"];

impl SimStats {
    /// Instructions retired per cycle.
    pub fn ipc(&self) -> f64 {
        self.instructions_retired as f64 / self.cycles.max(1) as f64
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;

        if want("summary") {
            let khz = (self.cycles as f64 / seconds) / 1000.0;
            println!("\n==========================================================");
            println!("SIMT CORE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_lanes                {}", self.lanes_retired);
            println!("sim_ipc                  {:.4}", self.ipc());
            println!("----------------------------------------------------------");
        }
        if want("frontend") {
            println!("FRONT END");
            println!("  fetch.issued           {}", self.fetches);
            println!(
                "  fetch.bubbles          {} ({:.2}%)",
                self.scheduler_bubbles,
                (self.scheduler_bubbles as f64 / cyc) * 100.0
            );
            println!("  decode.passed          {}", self.decoded);
            println!("  decode.squashed        {}", self.squashed);
            println!("  sched.redirects        {}", self.redirects);
            println!("  sched.barriers         {}", self.barrier_releases);
            println!("----------------------------------------------------------");
        }
        if want("backend") {
            println!("BACK END");
            println!("  issue.dispatched       {}", self.dispatched);
            println!("  issue.scoreboard       {}", self.scoreboard_stalls);
            println!("  lsu.backpressure       {}", self.lsu_backpressure);
            let units = FuKind::PIPELINED.into_iter().chain([FuKind::LoadStore]);
            for unit in units {
                println!(
                    "  unit.{:<16} {}",
                    unit.name(),
                    self.unit_ops[unit.index()]
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            let print_cache = |name: &str, hits: u64, misses: u64, merged: u64| {
                let total = hits + misses + merged;
                let rate = if total > 0 {
                    (hits as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                println!(
                    "  {name:<6} accesses: {total:<10} | hits: {hits:<10} | merged: {merged:<8} | miss_rate: {:.2}%",
                    100.0 - rate
                );
            };
            println!("MEMORY HIERARCHY");
            print_cache("L1-I", self.icache_hits, self.icache_misses, self.icache_merged);
            print_cache("L1-D", self.dcache_hits, self.dcache_misses, self.dcache_merged);
            println!("  icache.stalls          {}", self.icache_stalls);
            println!("  dcache.hit_stalls      {}", self.dcache_hit_stalls);
            println!("  dcache.writebacks      {}", self.dcache_writebacks);
            println!("  mem.requests.icache    {}", self.mem_requests_icache);
            println!("  mem.requests.dcache    {}", self.mem_requests_dcache);
            println!("  mem.stalls             {}", self.mem_stalls);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
