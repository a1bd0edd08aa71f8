//! Miss Status Holding Registers.
//!
//! One entry per block with an outstanding fill. Later misses to the same
//! block merge into the entry instead of issuing another memory request.
//! The table refuses new work when it has no free entry for a new block or
//! the block's entry has reached its merge limit; the caller stalls.

use std::collections::{HashMap, VecDeque};

/// Requests waiting on one block.
#[derive(Debug, Clone)]
pub struct Entry<R> {
    requests: VecDeque<R>,
    /// Cycles since the entry was allocated.
    pub age: u64,
}

impl<R> Entry<R> {
    /// Number of merged requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if no request is recorded.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Merged requests in arrival order.
    pub fn requests(&self) -> impl Iterator<Item = &R> {
        self.requests.iter()
    }
}

impl<R> Default for Entry<R> {
    fn default() -> Self {
        Self {
            requests: VecDeque::new(),
            age: 0,
        }
    }
}

/// Outcome of recording a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissKind {
    /// First miss to the block; a fill must be requested.
    Primary,
    /// Merged into an outstanding fill.
    Secondary,
}

/// Miss table keyed by block address.
#[derive(Debug, Clone)]
pub struct Table<R> {
    num_entries: usize,
    max_merged: usize,
    entries: HashMap<u32, Entry<R>>,
}

impl<R> Table<R> {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `num_entries` - Distinct blocks that may be outstanding.
    /// * `max_merged` - Requests one entry may hold.
    pub fn new(num_entries: usize, max_merged: usize) -> Self {
        Self {
            num_entries,
            max_merged,
            entries: HashMap::with_capacity(num_entries),
        }
    }

    /// Checks whether a miss to `block_addr` cannot be recorded right now.
    pub fn full(&self, block_addr: u32) -> bool {
        match self.entries.get(&block_addr) {
            Some(entry) => entry.requests.len() >= self.max_merged,
            None => self.entries.len() >= self.num_entries,
        }
    }

    /// Whether a fill for `block_addr` is outstanding.
    pub fn contains(&self, block_addr: u32) -> bool {
        self.entries.contains_key(&block_addr)
    }

    /// Pending requests for a block.
    pub fn get(&self, block_addr: u32) -> Option<&Entry<R>> {
        self.entries.get(&block_addr)
    }

    /// Records a miss.
    ///
    /// # Panics
    ///
    /// Panics if the table is `full` for this block.
    pub fn add(&mut self, block_addr: u32, request: R) -> MissKind {
        assert!(!self.full(block_addr), "MSHR overflow for block {block_addr:#010x}");
        let kind = if self.entries.contains_key(&block_addr) {
            MissKind::Secondary
        } else {
            MissKind::Primary
        };
        self.entries
            .entry(block_addr)
            .or_default()
            .requests
            .push_back(request);
        kind
    }

    /// Removes the entry for a filled block, returning its requests in arrival order.
    pub fn remove(&mut self, block_addr: u32) -> Vec<R> {
        self.entries
            .remove(&block_addr)
            .map(|entry| entry.requests.into())
            .unwrap_or_default()
    }

    /// Advances the age of every entry by one cycle.
    pub fn tick(&mut self) {
        for entry in self.entries.values_mut() {
            entry.age += 1;
        }
    }

    /// Number of outstanding blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no miss is outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
