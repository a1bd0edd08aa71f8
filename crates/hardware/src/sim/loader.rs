//! Program and Data Image Loader.
//!
//! This module reads the text images a run starts from. It provides:
//! 1. **Program images:** One instruction word per line, as 8 hex digits or
//!    32 binary digits. `//` and `#` start comments and `_` may separate digit
//!    groups. Words are stored little-endian at consecutive addresses from a base.
//! 2. **Data images:** Lines of `0xADDR 0xWORD`, the same format the memory
//!    dump writes, used to seed arguments, heap and stack.
//!
//! Every word is placed through `Memory::place`, so an image cannot land in
//! the MMIO window or outside the address map.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::LoadError;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::soc::Memory;

/// Digit format of a program image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
    /// 8 hexadecimal digits per line.
    #[default]
    Hex,
    /// 32 binary digits per line.
    Bin,
}

/// Drops comments and separators, returning the significant text of a line.
fn clean(line: &str) -> String {
    let end = [line.find("//"), line.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    line[..end].replace('_', "").trim().to_owned()
}

fn bad_line(line: usize, text: &str, reason: &'static str) -> LoadError {
    LoadError::BadLine {
        line,
        text: text.to_owned(),
        reason,
    }
}

/// Parses a program image into `(line number, word)` pairs.
///
/// # Errors
///
/// `LoadError::BadLine` for a line that is not exactly one word in `format`.
pub fn parse_program(text: &str, format: ImageFormat) -> Result<Vec<(usize, u32)>, LoadError> {
    let mut words = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let bits = clean(raw).to_uppercase();
        if bits.is_empty() {
            continue;
        }
        let (digits, radix, reason) = match format {
            ImageFormat::Hex => (8, 16, "expected 8 hex digits"),
            ImageFormat::Bin => (32, 2, "expected 32 binary digits"),
        };
        if bits.len() != digits {
            return Err(bad_line(line, &bits, reason));
        }
        let word = u32::from_str_radix(&bits, radix).map_err(|_| bad_line(line, &bits, reason))?;
        words.push((line, word));
    }
    Ok(words)
}

/// Stores a program image at `base`.
///
/// # Returns
///
/// The number of words loaded.
///
/// # Errors
///
/// `LoadError::BadLine` for malformed lines, `LoadError::Placement` when a
/// word falls outside a loadable region.
pub fn load_program(
    memory: &mut Memory,
    text: &str,
    format: ImageFormat,
    base: u32,
) -> Result<usize, LoadError> {
    let words = parse_program(text, format)?;
    for (i, &(line, word)) in words.iter().enumerate() {
        let addr = base.wrapping_add(i as u32 * INSTRUCTION_SIZE);
        memory
            .place(addr, word)
            .map_err(|source| LoadError::Placement { line, source })?;
    }
    debug!(words = words.len(), base = format_args!("{base:#x}"), "program loaded");
    Ok(words.len())
}

/// Reads and stores a program image file at `base`.
///
/// # Errors
///
/// `LoadError::Io` when the file cannot be read, otherwise as [`load_program`].
pub fn load_program_file(
    memory: &mut Memory,
    path: &Path,
    format: ImageFormat,
    base: u32,
) -> Result<usize, LoadError> {
    let text = read(path)?;
    load_program(memory, &text, format, base)
}

fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).ok()
}

/// Parses a data image into `(line number, address, word)` triples.
///
/// # Errors
///
/// `LoadError::BadLine` for a line that is not an address and a word.
pub fn parse_data(text: &str) -> Result<Vec<(usize, u32, u32)>, LoadError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            continue;
        }
        let mut tokens = cleaned.split_whitespace();
        let parsed = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(addr), Some(word), None) => parse_hex(addr).zip(parse_hex(word)),
            _ => None,
        };
        let Some((addr, word)) = parsed else {
            return Err(bad_line(line, &cleaned, "expected `0xADDR 0xWORD`"));
        };
        entries.push((line, addr, word));
    }
    Ok(entries)
}

/// Stores every word of a data image.
///
/// # Returns
///
/// The number of words loaded.
///
/// # Errors
///
/// As [`parse_data`], plus `LoadError::Placement` for rejected addresses.
pub fn load_data(memory: &mut Memory, text: &str) -> Result<usize, LoadError> {
    let entries = parse_data(text)?;
    for &(line, addr, word) in &entries {
        memory
            .place(addr, word)
            .map_err(|source| LoadError::Placement { line, source })?;
    }
    debug!(words = entries.len(), "data image loaded");
    Ok(entries.len())
}

/// Reads and stores a data image file.
///
/// # Errors
///
/// `LoadError::Io` when the file cannot be read, otherwise as [`load_data`].
pub fn load_data_file(memory: &mut Memory, path: &Path) -> Result<usize, LoadError> {
    let text = read(path)?;
    load_data(memory, &text)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
