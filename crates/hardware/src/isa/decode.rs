//! Instruction Decoder.
//!
//! Turns a raw 32-bit word into a [`Decoded`] record. Decoding is two table
//! lookups: bits 6-3 of the opcode select the format family, then the
//! family enum resolves the exact operation. Encodings that miss either
//! table decode as [`Op::Nop`] rather than failing.

use tracing::debug;

use crate::common::constants::PRED_MASK;

use super::instruction::{Decoded, InstructionBits, sign_extend};
use super::op::{BOp, COp, FOp, HOp, IOp, InstrType, JOp, Op, POp, ROp, SOp, UOp};

/// Family table indexed by opcode bits 6-3.
const FAMILIES: [Option<InstrType>; 16] = [
    Some(InstrType::R),
    Some(InstrType::R),
    Some(InstrType::I),
    Some(InstrType::I),
    Some(InstrType::I),
    Some(InstrType::F),
    Some(InstrType::S),
    Some(InstrType::S),
    Some(InstrType::B),
    None,
    Some(InstrType::U),
    Some(InstrType::C),
    Some(InstrType::J),
    Some(InstrType::P),
    None,
    Some(InstrType::H),
];

/// Packet class reported to the scheduler for every decoded instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Ordinary instruction inside a packet.
    #[default]
    Normal,
    /// Multi-op member (bit 30 set).
    Mop,
    /// Ends the packet; the group drains before fetching past it.
    Eop,
    /// Warp-group barrier.
    Barrier,
    /// Warp halt.
    Halt,
}

impl PacketKind {
    /// Returns `true` for the classes after which a warp stops fetching.
    pub const fn ends_packet(self) -> bool {
        matches!(self, Self::Eop | Self::Barrier | Self::Halt)
    }
}

/// Format family of an opcode.
pub const fn family(opcode: u32) -> Option<InstrType> {
    FAMILIES[((opcode >> 3) & 0xF) as usize]
}

/// Decodes a raw instruction word.
///
/// # Arguments
///
/// * `raw` - The instruction bits.
///
/// # Returns
///
/// The decoded record; unknown encodings yield `Op::Nop` with no operands.
pub fn decode(raw: u32) -> Decoded {
    let opcode = raw.opcode();
    let op = match family(opcode) {
        Some(InstrType::R) => ROp::from_opcode(opcode).map(Op::R),
        Some(InstrType::I) => IOp::from_opcode(opcode).map(Op::I),
        Some(InstrType::F) => FOp::from_opcode(opcode).map(Op::F),
        Some(InstrType::S) => SOp::from_opcode(opcode).map(Op::S),
        Some(InstrType::B) => BOp::from_opcode(opcode).map(Op::B),
        Some(InstrType::U) => UOp::from_opcode(opcode).map(Op::U),
        Some(InstrType::C) => COp::from_opcode(opcode).map(Op::C),
        Some(InstrType::J) => JOp::from_opcode(opcode).map(Op::J),
        Some(InstrType::P) => POp::from_opcode(opcode).map(Op::P),
        Some(InstrType::H) => HOp::from_opcode(opcode).map(Op::H),
        None => None,
    };
    let Some(op) = op else {
        debug!(raw = format_args!("{raw:#010x}"), opcode, "unknown opcode, decoding as nop");
        return Decoded {
            raw,
            ..Decoded::default()
        };
    };

    let guard = Some(raw.pred());
    let pred_field = raw.rd() & PRED_MASK as usize;
    let mut d = Decoded {
        raw,
        op,
        ..Decoded::default()
    };

    match op {
        Op::R(_) => {
            d.rd = Some(raw.rd());
            d.rs1 = Some(raw.rs1());
            d.rs2 = Some(raw.rs2());
            d.src_pred = guard;
        }
        Op::I(IOp::Jalr) => {
            d.rd = Some(raw.rd());
            d.rs1 = Some(raw.rs1());
            d.imm = raw.imm6();
        }
        Op::I(_) => {
            d.rd = Some(raw.rd());
            d.rs1 = Some(raw.rs1());
            d.imm = raw.imm6();
            d.src_pred = guard;
        }
        Op::F(_) => {
            d.rd = Some(raw.rd());
            d.rs1 = Some(raw.rs1());
            d.src_pred = guard;
        }
        Op::S(_) => {
            d.rs1 = Some(raw.rs1());
            d.rs2 = Some(raw.rs2());
            d.imm = sign_extend(raw.rd() as u32, 6);
            d.src_pred = guard;
        }
        Op::B(_) => {
            d.rs1 = Some(raw.rs1());
            d.rs2 = Some(raw.rs2());
            d.dest_pred = Some(pred_field);
            d.src_pred = guard;
        }
        Op::U(_) => {
            d.rd = Some(raw.rd());
            d.imm = raw.imm12() as i32;
            d.src_pred = guard;
        }
        Op::C(COp::Csrr) => {
            d.rd = Some(raw.rd());
            d.csr = raw.csr();
            d.src_pred = guard;
        }
        Op::C(COp::Csrw) => {
            d.rs1 = Some(raw.rd());
            d.csr = raw.csr();
            d.src_pred = guard;
        }
        Op::J(_) => {
            d.rd = Some(raw.rd());
            d.imm = sign_extend(raw.imm12(), 12);
        }
        Op::P(POp::Jpnz) => {
            d.pred_operand = Some(pred_field);
            d.imm = sign_extend(raw.imm12(), 12);
        }
        Op::P(POp::Prr) => {
            d.rd = Some(raw.rd());
            d.pred_operand = Some(raw.rs1() & PRED_MASK as usize);
        }
        Op::P(POp::Prw) => {
            d.rs1 = Some(raw.rs1());
            d.dest_pred = Some(pred_field);
        }
        Op::H(_) | Op::Nop => {}
    }
    d
}

/// Classifies a decoded instruction for the scheduler.
///
/// Jumps end their packet even without the EOP bit, so the group drains
/// and picks up the new PC before fetching further.
///
/// # Arguments
///
/// * `d` - The decoded instruction.
/// * `barrier_enabled` - Whether `bar` acts as a barrier or as a no-op.
pub fn packet_kind(d: &Decoded, barrier_enabled: bool) -> PacketKind {
    match d.op {
        Op::H(HOp::Halt) => PacketKind::Halt,
        Op::H(HOp::Bar) if barrier_enabled => PacketKind::Barrier,
        op if op.is_control() || d.raw.is_eop() => PacketKind::Eop,
        _ if d.raw.is_mop() => PacketKind::Mop,
        _ => PacketKind::Normal,
    }
}
