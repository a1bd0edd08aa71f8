//! Simulation driver, image loading and dumps.
//!
//! Provides the `Simulator` entry point together with the text formats a run
//! reads (program and data images) and writes (memory dumps).

/// Memory dump writer.
pub mod dump;

/// Program and data image loader.
pub mod loader;

/// Top-level simulator.
pub mod simulator;

pub use dump::{DumpOptions, DumpRange};
pub use loader::ImageFormat;
pub use simulator::Simulator;
