//! Pipeline stage implementations.
//!
//! The scheduler and the instruction cache live elsewhere; this module holds
//! the stages between them and the register file:
//! 1. **Decode:** Raw word to instruction record, predicate read, packet class.
//! 2. **Issue:** Per-group buffers, scoreboard check, operand read, dispatch.
//! 3. **Execute:** Pipelined functional units and the load/store unit.
//! 4. **Writeback:** One retire per cycle into architectural state.

/// Instruction decode stage.
pub mod decode;

/// Instruction issue stage.
pub mod issue;

/// Execute stage with every functional unit.
pub mod execute;

/// Writeback stage.
pub mod writeback;

pub use decode::DecodeStage;
pub use execute::ExecuteStage;
pub use issue::IssueStage;
pub use writeback::WritebackStage;
