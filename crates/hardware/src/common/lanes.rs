//! Per-lane activity masks.
//!
//! A `LaneMask` packs one bit per lane of a warp. It is the currency of
//! predicated execution: predicate registers hold masks, decoded
//! instructions carry the mask they execute under, and the load/store unit
//! tracks finished lanes with one.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use super::constants::WARP_SIZE;

/// One bit per lane; bit `i` set means lane `i` is active.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LaneMask(u32);

impl LaneMask {
    /// Every lane active.
    pub const ALL: Self = Self(u32::MAX);

    /// No lane active.
    pub const NONE: Self = Self(0);

    /// Wraps a raw bit pattern.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a mask from a per-lane predicate.
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        let mut bits = 0;
        for lane in 0..WARP_SIZE {
            if f(lane) {
                bits |= 1 << lane;
            }
        }
        Self(bits)
    }

    /// Returns whether `lane` is active.
    #[inline]
    pub const fn get(self, lane: usize) -> bool {
        self.0 >> lane & 1 == 1
    }

    /// Sets or clears `lane`.
    #[inline]
    pub const fn set(&mut self, lane: usize, on: bool) {
        if on {
            self.0 |= 1 << lane;
        } else {
            self.0 &= !(1 << lane);
        }
    }

    /// Returns `true` if any lane is active.
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if every lane is active.
    pub const fn all(self) -> bool {
        self.0 == u32::MAX
    }

    /// Number of active lanes.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest active lane, if any.
    pub const fn first(self) -> Option<usize> {
        if self.0 == 0 { None } else { Some(self.0.trailing_zeros() as usize) }
    }

    /// Iterates the active lanes in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..WARP_SIZE).filter(move |&lane| self.get(lane))
    }
}

impl BitAnd for LaneMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for LaneMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for LaneMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Debug for LaneMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaneMask({:#010x})", self.0)
    }
}

impl From<[bool; WARP_SIZE]> for LaneMask {
    fn from(lanes: [bool; WARP_SIZE]) -> Self {
        Self::from_fn(|lane| lanes[lane])
    }
}

/// One 32-bit word per lane.
pub type LaneWords = [u32; WARP_SIZE];
