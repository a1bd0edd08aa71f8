//! Memory Dump Writer.
//!
//! Writes one `0xADDR 0xWORD` line per word in ascending address order. Zero
//! words are skipped unless the caller asks for words that were explicitly
//! stored as zero. The output is the same format the data loader reads.

use std::io::{self, Write};

use crate::common::AddressSpace;
use crate::soc::Memory;

/// Address ranges a dump can be restricted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DumpRange {
    /// Arguments, heap and stack.
    Data,
    /// Program text.
    Instr,
    /// Every address.
    #[default]
    All,
}

impl DumpRange {
    /// Whether `addr` falls in this range.
    pub fn contains(self, addr: u32) -> bool {
        match self {
            Self::Data => AddressSpace::of(addr).is_some_and(AddressSpace::is_data),
            Self::Instr => AddressSpace::of(addr) == Some(AddressSpace::Instr),
            Self::All => true,
        }
    }
}

/// Dump filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Address range to include.
    pub range: DumpRange,
    /// Also emit zero words that were written at some point.
    pub stored_zeros: bool,
}

/// Writes the dump of `memory` to `out`.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_dump(memory: &Memory, out: &mut impl Write, options: &DumpOptions) -> io::Result<()> {
    for (addr, word) in memory.words() {
        if !options.range.contains(addr) {
            continue;
        }
        if word == 0 && !(options.stored_zeros && memory.was_written(addr)) {
            continue;
        }
        writeln!(out, "{addr:#010x} {word:#010x}")?;
    }
    Ok(())
}
