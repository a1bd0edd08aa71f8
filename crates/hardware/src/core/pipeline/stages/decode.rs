//! Decode Stage.
//!
//! This module implements the stage between the instruction cache and issue.
//! It performs the following:
//! 1. **Decoding:** Turns the raw word into a typed instruction record.
//! 2. **Predicate Read:** Latches the guard mask, plus the predicate operand of
//!    `prr` and `jpnz`.
//! 3. **Packet Classification:** Reports normal, MOP, EOP, barrier and halt to
//!    the scheduler.
//! 4. **Epoch Squash:** Drops fetches a warp-group made past the end of a packet.

use tracing::trace;

use crate::common::constants::WARPS_PER_GROUP;
use crate::config::Config;
use crate::core::arch::PredicateFile;
use crate::core::pipeline::latch::Latch;
use crate::core::pipeline::latches::{FetchedEntry, Instruction};
use crate::core::pipeline::signals::{DecodeSignal, FeedbackLinks};
use crate::isa::{decode, packet_kind};
use crate::stats::SimStats;

/// Decode stage state: one epoch fence per warp-group.
#[derive(Clone, Debug)]
pub struct DecodeStage {
    fences: Vec<u32>,
    warp_count: usize,
    barrier_enabled: bool,
}

impl DecodeStage {
    /// Creates the stage with every fence open.
    pub fn new(config: &Config) -> Self {
        Self {
            fences: vec![0; config.group_count()],
            warp_count: config.general.warp_count,
            barrier_enabled: config.scheduler.barrier,
        }
    }

    /// Last warp of `group`; its packet end closes the group's fence.
    const fn last_warp(&self, group: usize) -> usize {
        let odd = group * WARPS_PER_GROUP + 1;
        if odd < self.warp_count { odd } else { odd - 1 }
    }

    /// Executes the decode stage for one cycle.
    ///
    /// # Arguments
    ///
    /// * `input` - Instruction cache output.
    /// * `output` - Latch into issue.
    /// * `links` - Reads the cache hit link, writes the decode signal.
    /// * `preds` - Predicate file, read for the guard mask.
    /// * `stats` - Counters.
    pub fn tick(
        &mut self,
        input: &mut Latch<FetchedEntry>,
        output: &mut Latch<Instruction>,
        links: &mut FeedbackLinks,
        preds: &PredicateFile,
        stats: &mut SimStats,
    ) {
        if links.icache.is_waiting() || !output.ready_for_push() {
            return;
        }
        let Some(FetchedEntry { fetch, raw }) = input.pop() else {
            return;
        };

        let group = fetch.group();
        if fetch.epoch < self.fences[group] {
            stats.squashed += 1;
            trace!(warp = fetch.warp, pc = format_args!("{:#x}", fetch.pc), epoch = fetch.epoch, "squash");
            return;
        }

        let decoded = decode(raw);
        let packet = packet_kind(&decoded, self.barrier_enabled);
        let predicate = preds.read(fetch.warp, decoded.src_pred.unwrap_or(0), false);
        let mut inst = Instruction::new(fetch, decoded, packet, predicate);
        if let Some(slot) = decoded.pred_operand {
            inst.pred_value = preds.read(fetch.warp, slot, false);
        }

        if packet.ends_packet() && fetch.warp == self.last_warp(group) {
            self.fences[group] = fetch.epoch + 1;
        }

        trace!(
            warp = fetch.warp,
            pc = format_args!("{:#x}", fetch.pc),
            op = %decoded.op,
            packet = ?packet,
            "decode"
        );
        links.decode.send(DecodeSignal {
            kind: packet,
            warp: fetch.warp,
            pc: fetch.pc,
        });
        output.send(inst);
        stats.decoded += 1;
    }
}
