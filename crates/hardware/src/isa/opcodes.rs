//! Opcode assignments.
//!
//! Defines the 7-bit opcodes (bits 6-0) of every instruction. Bits 6-3 of
//! the opcode select the instruction family; the table in `decode` maps
//! them to formats.

// R-type: register-register (family rows 0x0, 0x1)

/// Integer add.
pub const ADD: u32 = 0x00;
/// Integer subtract.
pub const SUB: u32 = 0x01;
/// Integer multiply (low 32 bits).
pub const MUL: u32 = 0x02;
/// Signed integer divide.
pub const DIV: u32 = 0x03;
/// Bitwise and.
pub const AND: u32 = 0x04;
/// Bitwise or.
pub const OR: u32 = 0x05;
/// Bitwise xor.
pub const XOR: u32 = 0x06;
/// Set if less than (signed).
pub const SLT: u32 = 0x07;
/// Set if less than (unsigned).
pub const SLTU: u32 = 0x08;
/// Float add.
pub const ADDF: u32 = 0x09;
/// Float subtract.
pub const SUBF: u32 = 0x0A;
/// Float multiply.
pub const MULF: u32 = 0x0B;
/// Float divide.
pub const DIVF: u32 = 0x0C;
/// Shift left logical.
pub const SLL: u32 = 0x0D;
/// Shift right logical.
pub const SRL: u32 = 0x0E;
/// Shift right arithmetic.
pub const SRA: u32 = 0x0F;

// I-type: register-immediate, loads, jalr (rows 0x2, 0x3, 0x4)

/// Add immediate.
pub const ADDI: u32 = 0x10;
/// Subtract immediate.
pub const SUBI: u32 = 0x11;
/// Xor immediate.
pub const XORI: u32 = 0x14;
/// Or immediate.
pub const ORI: u32 = 0x15;
/// Set if less than immediate (signed).
pub const SLTI: u32 = 0x17;
/// Set if less than immediate (unsigned).
pub const SLTIU: u32 = 0x18;
/// Shift left logical by immediate.
pub const SLLI: u32 = 0x1D;
/// Shift right logical by immediate.
pub const SRLI: u32 = 0x1E;
/// Shift right arithmetic by immediate.
pub const SRAI: u32 = 0x1F;
/// Load word.
pub const LW: u32 = 0x20;
/// Load half-word, sign-extended.
pub const LH: u32 = 0x21;
/// Load byte, sign-extended.
pub const LB: u32 = 0x22;
/// Jump and link register.
pub const JALR: u32 = 0x23;

// F-type: unary float/conversion (row 0x5)

/// Inverse square root.
pub const ISQRT: u32 = 0x28;
/// Sine.
pub const SIN: u32 = 0x29;
/// Cosine.
pub const COS: u32 = 0x2A;
/// Signed integer to float.
pub const ITOF: u32 = 0x2B;
/// Float to signed integer (truncating).
pub const FTOI: u32 = 0x2C;

// S-type: stores (rows 0x6, 0x7)

/// Store word.
pub const SW: u32 = 0x30;
/// Store half-word.
pub const SH: u32 = 0x31;
/// Store byte.
pub const SB: u32 = 0x32;

// B-type: predicate-setting compares (row 0x8)

/// Equal.
pub const BEQ: u32 = 0x40;
/// Not equal.
pub const BNE: u32 = 0x41;
/// Greater or equal (signed).
pub const BGE: u32 = 0x42;
/// Greater or equal (unsigned).
pub const BGEU: u32 = 0x43;
/// Less than (signed).
pub const BLT: u32 = 0x44;
/// Less than (unsigned).
pub const BLTU: u32 = 0x45;

// U-type: upper/partial immediates (row 0xA)

/// Add upper immediate to PC.
pub const AUIPC: u32 = 0x50;
/// Load low 12 bits.
pub const LLI: u32 = 0x51;
/// Load middle 12 bits.
pub const LMI: u32 = 0x52;
/// Load upper 8 bits.
pub const LUI: u32 = 0x54;

// C-type: control/status registers (row 0xB)

/// Read CSR.
pub const CSRR: u32 = 0x58;
/// Write CSR.
pub const CSRW: u32 = 0x59;

// J-type (row 0xC)

/// Jump and link.
pub const JAL: u32 = 0x60;

// P-type: predicate control (row 0xD)

/// Jump if predicate non-zero.
pub const JPNZ: u32 = 0x68;
/// Predicate register read into an integer register.
pub const PRR: u32 = 0x69;
/// Predicate register write from an integer register.
pub const PRW: u32 = 0x6A;

// H-type: warp control (row 0xF)

/// Warp-group barrier.
pub const BAR: u32 = 0x7E;
/// Halt the warp.
pub const HALT: u32 = 0x7F;
