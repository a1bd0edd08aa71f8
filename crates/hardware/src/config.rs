//! Configuration system for the SIMT simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline machine constants (warps, caches, latencies, queue sizes).
//! 2. **Structures:** Hierarchical config for general, scheduler, caches, LSU, issue,
//!    execute and memory.
//! 3. **Enums:** Warp issue policy and memory arbitration policy.
//! 4. **Validation:** Geometry checks performed before a simulator is built.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or via `Config::default()`.
//! Every field is optional in JSON; missing fields take their defaults.

use serde::Deserialize;

use crate::common::constants::{SENTINEL_WARP, WORD_SIZE};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Program counter every warp-group starts at.
    pub const START_PC: u32 = 0x1000;

    /// Number of warps (two per warp-group).
    pub const WARP_COUNT: usize = 32;

    /// Cycle budget before a run is declared hung.
    pub const MAX_CYCLES: u64 = 5_000_000;

    /// Instruction cache capacity in bytes (4 KiB).
    pub const ICACHE_SIZE: usize = 4096;

    /// Instruction cache block size in bytes.
    pub const ICACHE_BLOCK: usize = 32;

    /// Instruction cache associativity.
    pub const ICACHE_WAYS: usize = 4;

    /// Data cache capacity in bytes (16 KiB).
    pub const DCACHE_SIZE: usize = 16 * 1024;

    /// Data cache block size in bytes (32 words).
    pub const DCACHE_BLOCK: usize = 128;

    /// Data cache associativity.
    pub const DCACHE_WAYS: usize = 8;

    /// Data cache bank count.
    pub const DCACHE_BANKS: usize = 2;

    /// Outstanding miss entries per cache.
    pub const MSHR_ENTRIES: usize = 8;

    /// Requests merged into one miss entry.
    pub const MSHR_MAX_MERGE: usize = 32;

    /// Fetches held in the instruction cache's in-order delivery queue.
    pub const ICACHE_FETCH_QUEUE: usize = 32;

    /// Load/store queue depth.
    pub const LSU_QUEUE: usize = 4;

    /// Completed memory instructions buffered before writeback.
    pub const WB_BUFFER: usize = 1;

    /// Per-group instruction buffer depth.
    pub const IBUFFER_DEPTH: usize = 4;

    /// Fixed service latency of the memory controller in cycles.
    pub const MEM_LATENCY: u64 = 5;

    /// Integer ALU latency.
    pub const ALU_LATENCY: usize = 1;

    /// Integer multiplier latency.
    pub const MUL_LATENCY: usize = 3;

    /// Integer divider latency.
    pub const DIV_LATENCY: usize = 8;

    /// Float add/sub latency.
    pub const FADD_LATENCY: usize = 3;

    /// Float multiplier latency.
    pub const FMUL_LATENCY: usize = 4;

    /// Float divider latency.
    pub const FDIV_LATENCY: usize = 10;

    /// Inverse square root latency.
    pub const ISQRT_LATENCY: usize = 12;

    /// Sine/cosine latency.
    pub const TRIG_LATENCY: usize = 12;

    /// Branch unit latency.
    pub const BRANCH_LATENCY: usize = 1;

    /// Results a unit can hold while writeback is busy.
    pub const UNIT_OUT_BUFFER: usize = 2;
}

/// Warp-group selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePolicy {
    /// Rotate through warp-groups, skipping any that are not ready.
    #[default]
    #[serde(alias = "rr", alias = "RoundRobin")]
    RoundRobin,
    /// Keep issuing from the current group while it stays ready, then fall
    /// back to the oldest (lowest id) ready group.
    #[serde(alias = "gto", alias = "GTO")]
    GreedyThenOldest,
}

/// Memory arbitration policy between the instruction and data caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbiterPolicy {
    /// Alternate priority after every grant.
    #[default]
    #[serde(alias = "rr")]
    RoundRobin,
    /// Instruction fetches always win.
    #[serde(alias = "icache_prio")]
    IcachePriority,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use simt_core::config::{Config, IssuePolicy};
///
/// let config = Config::from_json(r#"{
///     "general": { "warp_count": 8 },
///     "scheduler": { "policy": "gto" },
///     "memory": { "latency": 20 }
/// }"#).unwrap();
/// assert_eq!(config.general.warp_count, 8);
/// assert_eq!(config.scheduler.policy, IssuePolicy::GreedyThenOldest);
/// assert_eq!(config.memory.latency, 20);
/// assert_eq!(config.dcache.block_bytes, 128);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Warp scheduler settings
    pub scheduler: SchedulerConfig,
    /// Instruction cache geometry
    pub icache: CacheConfig,
    /// Data cache geometry
    pub dcache: DataCacheConfig,
    /// Load/store unit queues
    pub lsu: LsuConfig,
    /// Issue stage buffers
    pub issue: IssueConfig,
    /// Functional unit latencies
    pub execute: ExecuteConfig,
    /// Memory controller settings
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and `ConfigError::Invalid`
    /// when the resulting geometry cannot be built.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of warp-groups (`ceil(warp_count / 2)`).
    pub const fn group_count(&self) -> usize {
        self.general.warp_count.div_ceil(2)
    }

    /// Checks structural parameters.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.general.warp_count == 0 {
            return Err(invalid("general.warp_count", "must be at least 1"));
        }
        if self.general.warp_count >= SENTINEL_WARP {
            return Err(invalid(
                "general.warp_count",
                format!("must be below {SENTINEL_WARP}"),
            ));
        }
        if self.general.start_pc % 4 != 0 {
            return Err(invalid("general.start_pc", "must be word aligned"));
        }
        self.icache.validate("icache")?;
        self.dcache.geometry().validate("dcache")?;
        if self.dcache.banks == 0 || !self.dcache.banks.is_power_of_two() {
            return Err(invalid("dcache.banks", "must be a non-zero power of two"));
        }
        if self.dcache.sets() % self.dcache.banks != 0 {
            return Err(invalid("dcache.banks", "must divide the set count"));
        }
        if self.lsu.queue_size == 0 {
            return Err(invalid("lsu.queue_size", "must be at least 1"));
        }
        if self.lsu.wb_buffer_size == 0 {
            return Err(invalid("lsu.wb_buffer_size", "must be at least 1"));
        }
        if self.issue.ibuffer_depth == 0 {
            return Err(invalid("issue.ibuffer_depth", "must be at least 1"));
        }
        if self.execute.out_buffer == 0 {
            return Err(invalid("execute.out_buffer", "must be at least 1"));
        }
        if self.memory.latency == 0 {
            return Err(invalid("memory.latency", "must be at least 1 cycle"));
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Initial PC of every warp-group
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,

    /// Number of warps; groups are formed from consecutive even/odd pairs
    #[serde(default = "GeneralConfig::default_warp_count")]
    pub warp_count: usize,

    /// Cycle budget for `run_until_halt`
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Emit per-cycle stage events at `trace` level
    #[serde(default)]
    pub trace: bool,
}

impl GeneralConfig {
    fn default_start_pc() -> u32 {
        defaults::START_PC
    }

    fn default_warp_count() -> usize {
        defaults::WARP_COUNT
    }

    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            warp_count: defaults::WARP_COUNT,
            max_cycles: defaults::MAX_CYCLES,
            trace: false,
        }
    }
}

/// Warp scheduler settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SchedulerConfig {
    /// Group selection policy
    #[serde(default)]
    pub policy: IssuePolicy,

    /// Honor `bar` instructions; when off they decode as ordinary no-ops
    #[serde(default)]
    pub barrier: bool,
}

/// Geometry of a set-associative cache with a miss table.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Block size in bytes
    #[serde(default = "CacheConfig::default_block")]
    pub block_bytes: usize,

    /// Associativity
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Outstanding distinct block misses
    #[serde(default = "CacheConfig::default_mshr_entries")]
    pub mshr_entries: usize,

    /// Requests merged into a single miss entry
    #[serde(default = "CacheConfig::default_mshr_max_merge")]
    pub mshr_max_merge: usize,

    /// Fetches waiting for in-order delivery, hits and misses alike
    #[serde(default = "CacheConfig::default_fetch_queue")]
    pub fetch_queue: usize,
}

impl CacheConfig {
    fn default_size() -> usize {
        defaults::ICACHE_SIZE
    }

    fn default_block() -> usize {
        defaults::ICACHE_BLOCK
    }

    fn default_ways() -> usize {
        defaults::ICACHE_WAYS
    }

    fn default_mshr_entries() -> usize {
        defaults::MSHR_ENTRIES
    }

    fn default_mshr_max_merge() -> usize {
        defaults::MSHR_MAX_MERGE
    }

    fn default_fetch_queue() -> usize {
        defaults::ICACHE_FETCH_QUEUE
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.size_bytes / (self.block_bytes * self.ways)
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| ConfigError::Invalid {
            field,
            reason: format!("{name}: {reason}"),
        };
        if self.block_bytes < WORD_SIZE as usize || !self.block_bytes.is_power_of_two() {
            return Err(invalid("block_bytes", "must be a power of two of at least one word"));
        }
        if self.ways == 0 {
            return Err(invalid("ways", "must be at least 1"));
        }
        if self.size_bytes < self.block_bytes * self.ways || self.sets() == 0 {
            return Err(invalid("size_bytes", "smaller than one set"));
        }
        if !self.sets().is_power_of_two() {
            return Err(invalid("size_bytes", "set count must be a power of two"));
        }
        if self.mshr_entries == 0 || self.mshr_max_merge == 0 {
            return Err(invalid("mshr_entries", "miss table must hold at least one request"));
        }
        if self.fetch_queue == 0 {
            return Err(invalid("fetch_queue", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::ICACHE_SIZE,
            block_bytes: defaults::ICACHE_BLOCK,
            ways: defaults::ICACHE_WAYS,
            mshr_entries: defaults::MSHR_ENTRIES,
            mshr_max_merge: defaults::MSHR_MAX_MERGE,
            fetch_queue: defaults::ICACHE_FETCH_QUEUE,
        }
    }
}

/// Geometry of the banked data cache.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DataCacheConfig {
    /// Total capacity in bytes across all banks
    #[serde(default = "DataCacheConfig::default_size")]
    pub size_bytes: usize,

    /// Block size in bytes
    #[serde(default = "DataCacheConfig::default_block")]
    pub block_bytes: usize,

    /// Associativity
    #[serde(default = "DataCacheConfig::default_ways")]
    pub ways: usize,

    /// Number of banks; sets are interleaved across banks
    #[serde(default = "DataCacheConfig::default_banks")]
    pub banks: usize,

    /// Outstanding distinct block misses
    #[serde(default = "CacheConfig::default_mshr_entries")]
    pub mshr_entries: usize,

    /// Requests merged into a single miss entry
    #[serde(default = "CacheConfig::default_mshr_max_merge")]
    pub mshr_max_merge: usize,
}

impl DataCacheConfig {
    fn default_size() -> usize {
        defaults::DCACHE_SIZE
    }

    fn default_block() -> usize {
        defaults::DCACHE_BLOCK
    }

    fn default_ways() -> usize {
        defaults::DCACHE_WAYS
    }

    fn default_banks() -> usize {
        defaults::DCACHE_BANKS
    }

    /// Total number of sets across all banks.
    pub const fn sets(&self) -> usize {
        self.size_bytes / (self.block_bytes * self.ways)
    }

    /// The flat cache geometry (ignoring banking).
    pub const fn geometry(&self) -> CacheConfig {
        CacheConfig {
            size_bytes: self.size_bytes,
            block_bytes: self.block_bytes,
            ways: self.ways,
            mshr_entries: self.mshr_entries,
            mshr_max_merge: self.mshr_max_merge,
            fetch_queue: defaults::ICACHE_FETCH_QUEUE,
        }
    }
}

impl Default for DataCacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::DCACHE_SIZE,
            block_bytes: defaults::DCACHE_BLOCK,
            ways: defaults::DCACHE_WAYS,
            banks: defaults::DCACHE_BANKS,
            mshr_entries: defaults::MSHR_ENTRIES,
            mshr_max_merge: defaults::MSHR_MAX_MERGE,
        }
    }
}

/// Load/store unit queue sizes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LsuConfig {
    /// Memory instructions in flight inside the unit
    #[serde(default = "LsuConfig::default_queue")]
    pub queue_size: usize,

    /// Completed memory instructions awaiting writeback
    #[serde(default = "LsuConfig::default_wb_buffer")]
    pub wb_buffer_size: usize,
}

impl LsuConfig {
    fn default_queue() -> usize {
        defaults::LSU_QUEUE
    }

    fn default_wb_buffer() -> usize {
        defaults::WB_BUFFER
    }
}

impl Default for LsuConfig {
    fn default() -> Self {
        Self {
            queue_size: defaults::LSU_QUEUE,
            wb_buffer_size: defaults::WB_BUFFER,
        }
    }
}

/// Issue stage settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IssueConfig {
    /// Decoded instructions buffered per warp-group
    #[serde(default = "IssueConfig::default_depth")]
    pub ibuffer_depth: usize,
}

impl IssueConfig {
    fn default_depth() -> usize {
        defaults::IBUFFER_DEPTH
    }
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            ibuffer_depth: defaults::IBUFFER_DEPTH,
        }
    }
}

/// Functional unit pipeline depths, in cycles.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExecuteConfig {
    /// Integer ALU
    #[serde(default = "ExecuteConfig::default_alu")]
    pub alu: usize,
    /// Integer multiplier
    #[serde(default = "ExecuteConfig::default_mul")]
    pub mul: usize,
    /// Integer divider
    #[serde(default = "ExecuteConfig::default_div")]
    pub div: usize,
    /// Float add/sub
    #[serde(default = "ExecuteConfig::default_fadd")]
    pub fadd: usize,
    /// Float multiplier
    #[serde(default = "ExecuteConfig::default_fmul")]
    pub fmul: usize,
    /// Float divider
    #[serde(default = "ExecuteConfig::default_fdiv")]
    pub fdiv: usize,
    /// Inverse square root
    #[serde(default = "ExecuteConfig::default_isqrt")]
    pub isqrt: usize,
    /// Sine/cosine
    #[serde(default = "ExecuteConfig::default_trig")]
    pub trig: usize,
    /// Branch/predicate unit
    #[serde(default = "ExecuteConfig::default_branch")]
    pub branch: usize,
    /// Output buffer depth of every unit
    #[serde(default = "ExecuteConfig::default_out_buffer")]
    pub out_buffer: usize,
}

impl ExecuteConfig {
    fn default_alu() -> usize {
        defaults::ALU_LATENCY
    }
    fn default_mul() -> usize {
        defaults::MUL_LATENCY
    }
    fn default_div() -> usize {
        defaults::DIV_LATENCY
    }
    fn default_fadd() -> usize {
        defaults::FADD_LATENCY
    }
    fn default_fmul() -> usize {
        defaults::FMUL_LATENCY
    }
    fn default_fdiv() -> usize {
        defaults::FDIV_LATENCY
    }
    fn default_isqrt() -> usize {
        defaults::ISQRT_LATENCY
    }
    fn default_trig() -> usize {
        defaults::TRIG_LATENCY
    }
    fn default_branch() -> usize {
        defaults::BRANCH_LATENCY
    }
    fn default_out_buffer() -> usize {
        defaults::UNIT_OUT_BUFFER
    }
}

impl Default for ExecuteConfig {
    fn default() -> Self {
        Self {
            alu: defaults::ALU_LATENCY,
            mul: defaults::MUL_LATENCY,
            div: defaults::DIV_LATENCY,
            fadd: defaults::FADD_LATENCY,
            fmul: defaults::FMUL_LATENCY,
            fdiv: defaults::FDIV_LATENCY,
            isqrt: defaults::ISQRT_LATENCY,
            trig: defaults::TRIG_LATENCY,
            branch: defaults::BRANCH_LATENCY,
            out_buffer: defaults::UNIT_OUT_BUFFER,
        }
    }
}

/// Memory controller and backing store settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MemoryConfig {
    /// Cycles from accept to completion
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// Arbitration between instruction and data cache requests
    #[serde(default)]
    pub arbiter: ArbiterPolicy,

    /// Treat unmapped accesses as reads of zero / dropped writes instead of errors
    #[serde(default)]
    pub allow_oob: bool,

    /// Permit stores into the instruction region
    #[serde(default)]
    pub allow_instr_writes: bool,
}

impl MemoryConfig {
    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: defaults::MEM_LATENCY,
            arbiter: ArbiterPolicy::default(),
            allow_oob: false,
            allow_instr_writes: false,
        }
    }
}
