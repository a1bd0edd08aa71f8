//! Instruction Set Architecture definitions.
//!
//! Contains the opcode map, the typed operation enums, field extraction and
//! the decoder for the fixed 32-bit SIMT instruction encoding.
//!
//! # Formats
//!
//! * `R`: register-register integer and float arithmetic.
//! * `I`: register-immediate arithmetic, loads, `jalr`.
//! * `F`: unary float operations and conversions.
//! * `S`: stores.
//! * `B`: compares that write a predicate register.
//! * `U`: partial immediates (`auipc`, `lli`, `lmi`, `lui`).
//! * `C`: CSR access.
//! * `J`: `jal`.
//! * `P`: predicate control (`jpnz`, `prr`, `prw`).
//! * `H`: warp control (`bar`, `halt`).

/// Instruction decoding and packet classification.
pub mod decode;

/// Assembly text rendering for decoded instructions.
pub mod disasm;

/// Field extraction and the decoded instruction record.
pub mod instruction;

/// Typed operations and functional unit classes.
pub mod op;

/// Raw opcode assignments.
pub mod opcodes;

pub use decode::{PacketKind, decode, packet_kind};
pub use instruction::{Decoded, InstructionBits};
pub use op::{FuKind, InstrType, Op};
