//! SIMT instruction pipeline.
//!
//! This module contains everything between the warp scheduler and the
//! register file. It includes the following components:
//! 1. **Latch:** Single-slot stage registers and sideband links.
//! 2. **Latches:** Entry types carried from stage to stage.
//! 3. **Scheduler:** Warp-group state machine and selection policies.
//! 4. **Scoreboard:** Pending register writes per warp.
//! 5. **Signals:** Feedback from decode, issue, execute and writeback.
//! 6. **Stages:** Decode, issue, execute and writeback.

/// Single-slot latch and forwarding link.
pub mod latch;

/// Inter-stage entry types (fetch, fetched, in-flight instruction).
pub mod latches;

/// Warp scheduler.
pub mod scheduler;

/// Register hazard tracking.
pub mod scoreboard;

/// Feedback signals into the scheduler.
pub mod signals;

/// Pipeline stage implementations (decode, issue, execute, writeback).
pub mod stages;
