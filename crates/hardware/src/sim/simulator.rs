//! Simulator: one SIMT core plus its run-level bookkeeping.
//!
//! `Simulator` is the entry point for callers. It validates the
//! configuration, loads images into memory, steps the core until every
//! warp-group halts, and writes the end-of-run dumps.

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use super::dump::{self, DumpOptions};
use super::loader::{self, ImageFormat};
use crate::common::SimError;
use crate::config::Config;
use crate::core::Sm;
use crate::core::arch::ArchState;
use crate::soc::Memory;
use crate::stats::SimStats;

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The core, its caches and its memory.
    pub sm: Sm,
    max_cycles: u64,
}

impl Simulator {
    /// Creates a simulator with empty memory.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` when the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let mut sm = Sm::new(config);
        if cfg!(feature = "always-trace") {
            sm.trace = true;
        }
        debug!(
            warps = config.general.warp_count,
            groups = config.group_count(),
            policy = ?config.scheduler.policy,
            "simulator built"
        );
        Ok(Self {
            sm,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Overrides the cycle budget of [`Simulator::run_until_halt`].
    pub const fn set_max_cycles(&mut self, max_cycles: u64) {
        self.max_cycles = max_cycles;
    }

    /// Loads a program image from text.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Load` for malformed or misplaced words.
    pub fn load_program(&mut self, text: &str, format: ImageFormat, base: u32) -> Result<usize, SimError> {
        Ok(loader::load_program(&mut self.sm.memory, text, format, base)?)
    }

    /// Loads a program image file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Load` for unreadable files and malformed or misplaced words.
    pub fn load_program_file(
        &mut self,
        path: &Path,
        format: ImageFormat,
        base: u32,
    ) -> Result<usize, SimError> {
        Ok(loader::load_program_file(&mut self.sm.memory, path, format, base)?)
    }

    /// Loads a data image from text.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Load` for malformed or misplaced words.
    pub fn load_data(&mut self, text: &str) -> Result<usize, SimError> {
        Ok(loader::load_data(&mut self.sm.memory, text)?)
    }

    /// Loads a data image file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Load` for unreadable files and malformed or misplaced words.
    pub fn load_data_file(&mut self, path: &Path) -> Result<usize, SimError> {
        Ok(loader::load_data_file(&mut self.sm.memory, path)?)
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Memory` when a data access violates the address map.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.sm.tick()
    }

    /// Returns `true` once every warp-group has halted and the core is drained.
    pub fn is_done(&self) -> bool {
        self.sm.is_done()
    }

    /// Runs until every warp-group halts, then writes dirty cache lines back.
    ///
    /// # Returns
    ///
    /// The number of cycles simulated.
    ///
    /// # Errors
    ///
    /// `SimError::StepLimit` when the budget runs out first, or the first
    /// memory error raised by the core.
    pub fn run_until_halt(&mut self) -> Result<u64, SimError> {
        while !self.sm.is_done() {
            if self.sm.stats.cycles >= self.max_cycles {
                return Err(SimError::StepLimit {
                    cycles: self.sm.stats.cycles,
                });
            }
            self.sm.tick()?;
        }
        self.sm.dcache.flush(&mut self.sm.memory);
        info!(
            cycles = self.sm.stats.cycles,
            retired = self.sm.stats.instructions_retired,
            "all warps halted"
        );
        Ok(self.sm.stats.cycles)
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.sm.stats
    }

    /// Backing store.
    pub const fn memory(&self) -> &Memory {
        &self.sm.memory
    }

    /// Registers, predicates and CSRs.
    pub const fn arch(&self) -> &ArchState {
        &self.sm.arch
    }

    /// Writes the memory dump.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn dump_memory(&self, out: &mut impl Write, options: &DumpOptions) -> io::Result<()> {
        dump::write_dump(&self.sm.memory, out, options)
    }

    /// Writes the register dump of every warp with live state.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn dump_registers(&self, out: &mut impl Write) -> io::Result<()> {
        self.sm.arch.regs.dump(out)
    }
}
