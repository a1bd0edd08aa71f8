//! Pipelined functional unit.
//!
//! A unit of latency `L` is a queue of `L` slots. An instruction enters the
//! tail slot, computes its lanes on entry, and reaches the head after `L`
//! cycles, then moves into a small output buffer that writeback drains.
//!
//! When the output buffer is full the head cannot leave. The unit then
//! compacts instead of advancing: the oldest empty slot is removed and a new
//! one opens at the tail, so work behind a bubble keeps moving and the unit
//! can keep accepting until every slot is occupied.

use std::collections::VecDeque;

use super::alu::Alu;
use super::bru::Bru;
use super::fpu::Fpu;
use crate::core::pipeline::latches::Instruction;
use crate::isa::FuKind;

/// Computes the lane results of `inst` on the unit class that owns it.
pub fn compute(inst: &mut Instruction) {
    match inst.unit {
        FuKind::Alu | FuKind::IntMul | FuKind::IntDiv => Alu::execute(inst),
        FuKind::FpAddSub | FuKind::FpMul | FuKind::FpDiv | FuKind::InvSqrt | FuKind::Trig => {
            Fpu::execute(inst);
        }
        FuKind::Branch => Bru::execute(inst),
        FuKind::LoadStore => {}
    }
}

/// One pipelined functional unit with its output buffer.
#[derive(Debug, Clone)]
pub struct FunctionalUnit {
    kind: FuKind,
    slots: VecDeque<Option<Instruction>>,
    out: VecDeque<Instruction>,
    out_capacity: usize,
}

impl FunctionalUnit {
    /// Creates an empty unit.
    ///
    /// # Arguments
    ///
    /// * `kind` - Unit class.
    /// * `latency` - Cycles from accept to output, at least 1.
    /// * `out_capacity` - Output buffer entries, at least 1.
    pub fn new(kind: FuKind, latency: usize, out_capacity: usize) -> Self {
        Self {
            kind,
            slots: std::iter::repeat_with(|| None).take(latency.max(1)).collect(),
            out: VecDeque::with_capacity(out_capacity),
            out_capacity: out_capacity.max(1),
        }
    }

    /// Unit class.
    pub const fn kind(&self) -> FuKind {
        self.kind
    }

    /// Whether the tail slot is free.
    pub fn can_accept(&self) -> bool {
        self.slots.back().is_some_and(Option::is_none)
    }

    /// Computes `inst` and places it in the tail slot.
    ///
    /// # Errors
    ///
    /// Returns `inst` unchanged when the tail slot is occupied.
    pub fn accept(&mut self, mut inst: Instruction) -> Result<(), Instruction> {
        match self.slots.back_mut() {
            Some(tail @ None) => {
                compute(&mut inst);
                *tail = Some(inst);
                Ok(())
            }
            _ => Err(inst),
        }
    }

    /// Advances the unit by one cycle.
    ///
    /// # Returns
    ///
    /// The instruction that moved into the output buffer this cycle, if any.
    pub fn tick(&mut self) -> Option<&Instruction> {
        if self.out.len() < self.out_capacity {
            let head = self.slots.pop_front().flatten();
            self.slots.push_back(None);
            if let Some(inst) = head {
                self.out.push_back(inst);
                return self.out.back();
            }
        } else if let Some(bubble) = self.slots.iter().position(Option::is_none) {
            let _ = self.slots.remove(bubble);
            self.slots.push_back(None);
        }
        None
    }

    /// Oldest finished instruction.
    pub fn peek_out(&self) -> Option<&Instruction> {
        self.out.front()
    }

    /// Removes the oldest finished instruction.
    pub fn pop_out(&mut self) -> Option<Instruction> {
        self.out.pop_front()
    }

    /// Instructions in the slots and the output buffer.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().flatten().count() + self.out.len()
    }

    /// Returns `true` when the unit holds no instruction.
    pub fn is_idle(&self) -> bool {
        self.occupancy() == 0
    }
}
