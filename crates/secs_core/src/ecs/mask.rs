//! # Component Masks
//!
//! One bit per registered component type, packed into a host word.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bytemuck::{Pod, Zeroable};

/// Bit field of component types.
///
/// The registry hands out single-bit masks (`1 << k` for the k-th
/// registered type). Masks may be ORed together to describe a combination,
/// e.g. for [`Query`](super::Query) include/exclude sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The empty mask: no components.
    pub const EMPTY: Self = Self(0);

    /// Number of bits in a mask.
    pub const BITS: u32 = u64::BITS;

    /// Creates a mask from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if exactly one bit is set.
    #[inline]
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.0.is_power_of_two()
    }

    /// Returns true if every bit of `other` is also set in `self`.
    ///
    /// The empty mask is contained in every mask.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `self` and `other` share at least one bit.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets every bit of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears every bit of `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the single-bit masks set in `self`, lowest first.
    #[inline]
    pub fn iter_bits(self) -> impl Iterator<Item = ComponentMask> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let lowest = remaining & remaining.wrapping_neg();
            remaining &= !lowest;
            Some(Self(lowest))
        })
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ComponentMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ComponentMask {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for ComponentMask {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl std::fmt::Display for ComponentMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_and_intersects() {
        let a = ComponentMask::from_bits(0b001);
        let b = ComponentMask::from_bits(0b010);
        let ab = a | b;

        assert!(ab.contains(a));
        assert!(ab.contains(ab));
        assert!(!a.contains(ab));
        assert!(a.contains(ComponentMask::EMPTY));
        assert!(ab.intersects(b));
        assert!(!a.intersects(b));
    }

    #[test]
    fn test_insert_remove() {
        let mut mask = ComponentMask::EMPTY;
        mask.insert(ComponentMask::from_bits(4));
        mask.insert(ComponentMask::from_bits(1));
        assert_eq!(mask.bits(), 5);

        mask.remove(ComponentMask::from_bits(4));
        assert_eq!(mask.bits(), 1);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_is_single() {
        assert!(ComponentMask::from_bits(1 << 40).is_single());
        assert!(!ComponentMask::EMPTY.is_single());
        assert!(!ComponentMask::from_bits(3).is_single());
    }

    #[test]
    fn test_iter_bits() {
        let mask = ComponentMask::from_bits(0b1010_0001);
        let bits: Vec<u64> = mask.iter_bits().map(ComponentMask::bits).collect();
        assert_eq!(bits, vec![0b1, 0b10_0000, 0b1000_0000]);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(ComponentMask::from_bits(0x7).to_string(), "0x7");
    }
}
