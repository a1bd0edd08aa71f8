//! Least Recently Used (LRU) Replacement.
//!
//! Each set keeps a usage stack of way indices. An access moves its way to
//! the top (Most Recently Used position); the bottom of the stack is the
//! victim. Ways never touched stay at the bottom, so empty frames fill
//! before any valid line is evicted.
//!
//! # Performance
//!
//! - `touch()`: O(W) where W is the associativity
//! - `victim()`: O(1)
//! - Space: O(S × W) where S is the number of sets

/// LRU state for every set of one tag array.
#[derive(Clone, Debug)]
pub struct LruPolicy {
    /// One usage stack per set. Index 0 is MRU, last index is LRU.
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Creates LRU state for `sets` sets of `ways` ways.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            usage: (0..sets).map(|_| (0..ways).rev().collect()).collect(),
        }
    }

    /// Marks `way` of `set` most recently used.
    pub fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            let _ = stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// The least recently used way of `set`.
    pub fn victim(&self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }
}
