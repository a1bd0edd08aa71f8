//! Typed operations.
//!
//! Every opcode belongs to exactly one format family. `Op` is the tagged
//! union over the families; each family enum maps to and from its 7-bit
//! opcode and knows its mnemonic. `Op::unit` assigns the functional unit
//! that executes it.

use std::fmt;

use super::opcodes;

macro_rules! op_family {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:path => $mnemonic:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Looks up an opcode within this family.
            pub const fn from_opcode(opcode: u32) -> Option<Self> {
                match opcode {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The 7-bit opcode.
            pub const fn opcode(self) -> u32 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            /// Assembly mnemonic.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Self::$variant => $mnemonic ),+
                }
            }
        }
    };
}

op_family! {
    /// Register-register operations.
    ROp {
        /// Wrapping add.
        Add = opcodes::ADD => "add",
        /// Wrapping subtract.
        Sub = opcodes::SUB => "sub",
        /// Wrapping multiply.
        Mul = opcodes::MUL => "mul",
        /// Signed divide.
        Div = opcodes::DIV => "div",
        /// Bitwise and.
        And = opcodes::AND => "and",
        /// Bitwise or.
        Or = opcodes::OR => "or",
        /// Bitwise xor.
        Xor = opcodes::XOR => "xor",
        /// Signed compare.
        Slt = opcodes::SLT => "slt",
        /// Unsigned compare.
        Sltu = opcodes::SLTU => "sltu",
        /// Float add.
        Addf = opcodes::ADDF => "addf",
        /// Float subtract.
        Subf = opcodes::SUBF => "subf",
        /// Float multiply.
        Mulf = opcodes::MULF => "mulf",
        /// Float divide.
        Divf = opcodes::DIVF => "divf",
        /// Logical left shift.
        Sll = opcodes::SLL => "sll",
        /// Logical right shift.
        Srl = opcodes::SRL => "srl",
        /// Arithmetic right shift.
        Sra = opcodes::SRA => "sra",
    }
}

op_family! {
    /// Register-immediate operations, loads, and `jalr`.
    IOp {
        /// Add immediate.
        Addi = opcodes::ADDI => "addi",
        /// Subtract immediate.
        Subi = opcodes::SUBI => "subi",
        /// Xor immediate.
        Xori = opcodes::XORI => "xori",
        /// Or immediate.
        Ori = opcodes::ORI => "ori",
        /// Signed compare with immediate.
        Slti = opcodes::SLTI => "slti",
        /// Unsigned compare with immediate.
        Sltiu = opcodes::SLTIU => "sltiu",
        /// Left shift by immediate.
        Slli = opcodes::SLLI => "slli",
        /// Logical right shift by immediate.
        Srli = opcodes::SRLI => "srli",
        /// Arithmetic right shift by immediate.
        Srai = opcodes::SRAI => "srai",
        /// Load word.
        Lw = opcodes::LW => "lw",
        /// Load half-word.
        Lh = opcodes::LH => "lh",
        /// Load byte.
        Lb = opcodes::LB => "lb",
        /// Jump and link register.
        Jalr = opcodes::JALR => "jalr",
    }
}

op_family! {
    /// Unary float and conversion operations.
    FOp {
        /// Inverse square root.
        Isqrt = opcodes::ISQRT => "isqrt",
        /// Sine.
        Sin = opcodes::SIN => "sin",
        /// Cosine.
        Cos = opcodes::COS => "cos",
        /// Integer to float.
        Itof = opcodes::ITOF => "itof",
        /// Float to integer.
        Ftoi = opcodes::FTOI => "ftoi",
    }
}

op_family! {
    /// Stores.
    SOp {
        /// Store word.
        Sw = opcodes::SW => "sw",
        /// Store half-word.
        Sh = opcodes::SH => "sh",
        /// Store byte.
        Sb = opcodes::SB => "sb",
    }
}

op_family! {
    /// Compares that write a predicate register.
    BOp {
        /// Equal.
        Beq = opcodes::BEQ => "beq",
        /// Not equal.
        Bne = opcodes::BNE => "bne",
        /// Signed greater or equal.
        Bge = opcodes::BGE => "bge",
        /// Unsigned greater or equal.
        Bgeu = opcodes::BGEU => "bgeu",
        /// Signed less than.
        Blt = opcodes::BLT => "blt",
        /// Unsigned less than.
        Bltu = opcodes::BLTU => "bltu",
    }
}

op_family! {
    /// Upper and partial immediates.
    UOp {
        /// PC-relative upper immediate.
        Auipc = opcodes::AUIPC => "auipc",
        /// Replace bits 11-0.
        Lli = opcodes::LLI => "lli",
        /// Replace bits 23-12.
        Lmi = opcodes::LMI => "lmi",
        /// Replace bits 31-24.
        Lui = opcodes::LUI => "lui",
    }
}

op_family! {
    /// Control/status register access.
    COp {
        /// Read a CSR.
        Csrr = opcodes::CSRR => "csrr",
        /// Write a CSR.
        Csrw = opcodes::CSRW => "csrw",
    }
}

op_family! {
    /// Unconditional jumps.
    JOp {
        /// Jump and link.
        Jal = opcodes::JAL => "jal",
    }
}

op_family! {
    /// Predicate control.
    POp {
        /// Jump if any active lane of the predicate is set.
        Jpnz = opcodes::JPNZ => "jpnz",
        /// Copy a predicate into an integer register.
        Prr = opcodes::PRR => "prr",
        /// Write a predicate from an integer register.
        Prw = opcodes::PRW => "prw",
    }
}

op_family! {
    /// Warp control.
    HOp {
        /// Warp-group barrier.
        Bar = opcodes::BAR => "bar",
        /// Halt.
        Halt = opcodes::HALT => "halt",
    }
}

/// Instruction format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrType {
    /// Register-register.
    R,
    /// Register-immediate, loads, `jalr`.
    I,
    /// Unary float.
    F,
    /// Store.
    S,
    /// Predicate-setting compare.
    B,
    /// Upper immediate.
    U,
    /// CSR access.
    C,
    /// Jump.
    J,
    /// Predicate control.
    P,
    /// Warp control.
    H,
}

/// A decoded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// Register-register.
    R(ROp),
    /// Register-immediate.
    I(IOp),
    /// Unary float.
    F(FOp),
    /// Store.
    S(SOp),
    /// Predicate-setting compare.
    B(BOp),
    /// Upper immediate.
    U(UOp),
    /// CSR access.
    C(COp),
    /// Jump.
    J(JOp),
    /// Predicate control.
    P(POp),
    /// Warp control.
    H(HOp),
    /// Unknown encoding; executes as a no-op.
    #[default]
    Nop,
}

/// Functional unit classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuKind {
    /// Integer ALU (logic, add/sub, shifts, compares, conversions, immediates, CSRs).
    Alu,
    /// Integer multiplier.
    IntMul,
    /// Integer divider.
    IntDiv,
    /// Float add/subtract.
    FpAddSub,
    /// Float multiplier.
    FpMul,
    /// Float divider.
    FpDiv,
    /// Inverse square root.
    InvSqrt,
    /// Sine/cosine.
    Trig,
    /// Branch, jump and predicate unit.
    Branch,
    /// Load/store unit.
    LoadStore,
}

impl FuKind {
    /// Every pipelined unit, excluding the load/store unit.
    pub const PIPELINED: [Self; 9] = [
        Self::Alu,
        Self::IntMul,
        Self::IntDiv,
        Self::FpAddSub,
        Self::FpMul,
        Self::FpDiv,
        Self::InvSqrt,
        Self::Trig,
        Self::Branch,
    ];

    /// Dense index for per-unit tables; the load/store unit is last.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used in traces and statistics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alu => "alu",
            Self::IntMul => "imul",
            Self::IntDiv => "idiv",
            Self::FpAddSub => "fadd",
            Self::FpMul => "fmul",
            Self::FpDiv => "fdiv",
            Self::InvSqrt => "isqrt",
            Self::Trig => "trig",
            Self::Branch => "branch",
            Self::LoadStore => "lsu",
        }
    }
}

impl Op {
    /// Format family, or `None` for `Nop`.
    pub const fn family(self) -> Option<InstrType> {
        Some(match self {
            Self::R(_) => InstrType::R,
            Self::I(_) => InstrType::I,
            Self::F(_) => InstrType::F,
            Self::S(_) => InstrType::S,
            Self::B(_) => InstrType::B,
            Self::U(_) => InstrType::U,
            Self::C(_) => InstrType::C,
            Self::J(_) => InstrType::J,
            Self::P(_) => InstrType::P,
            Self::H(_) => InstrType::H,
            Self::Nop => return None,
        })
    }

    /// Functional unit that executes this operation.
    pub const fn unit(self) -> FuKind {
        match self {
            Self::R(ROp::Mul) => FuKind::IntMul,
            Self::R(ROp::Div) => FuKind::IntDiv,
            Self::R(ROp::Addf | ROp::Subf) => FuKind::FpAddSub,
            Self::R(ROp::Mulf) => FuKind::FpMul,
            Self::R(ROp::Divf) => FuKind::FpDiv,
            Self::F(FOp::Isqrt) => FuKind::InvSqrt,
            Self::F(FOp::Sin | FOp::Cos) => FuKind::Trig,
            Self::I(IOp::Lw | IOp::Lh | IOp::Lb) | Self::S(_) | Self::H(HOp::Halt) => {
                FuKind::LoadStore
            }
            Self::I(IOp::Jalr) | Self::B(_) | Self::J(_) | Self::P(_) => FuKind::Branch,
            _ => FuKind::Alu,
        }
    }

    /// Loads and stores.
    pub const fn is_memory(self) -> bool {
        matches!(self, Self::I(IOp::Lw | IOp::Lh | IOp::Lb) | Self::S(_))
    }

    /// Jumps that redirect the warp-group (`jal`, `jalr`, `jpnz`).
    pub const fn is_control(self) -> bool {
        matches!(self, Self::J(_) | Self::I(IOp::Jalr) | Self::P(POp::Jpnz))
    }

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::R(op) => op.mnemonic(),
            Self::I(op) => op.mnemonic(),
            Self::F(op) => op.mnemonic(),
            Self::S(op) => op.mnemonic(),
            Self::B(op) => op.mnemonic(),
            Self::U(op) => op.mnemonic(),
            Self::C(op) => op.mnemonic(),
            Self::J(op) => op.mnemonic(),
            Self::P(op) => op.mnemonic(),
            Self::H(op) => op.mnemonic(),
            Self::Nop => "nop",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
