use std::fmt;
use std::ops::{BitXor, BitXorAssign};

use crate::SystemError;

/// A lamp pattern: bit `i` is lamp `i`, lamp 0 is the least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Bits(u64);

impl Bits {
    pub const WIDTH: usize = u64::BITS as usize;
    pub const ZERO: Bits = Bits(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Build a mask with the given bit positions set.
    ///
    /// Repeated indices are idempotent.
    pub fn from_indices(indices: &[usize]) -> Result<Self, SystemError> {
        let mut value = 0u64;
        for &index in indices {
            if index >= Self::WIDTH {
                return Err(SystemError::BitOutOfRange { index });
            }
            value |= 1 << index;
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < Self::WIDTH && self.0 & (1 << index) != 0
    }

    /// Number of bits needed to hold the highest set lamp.
    #[must_use]
    pub const fn significant_width(self) -> usize {
        (u64::BITS - self.0.leading_zeros()) as usize
    }

    /// Whether every set bit lies below `width`.
    #[must_use]
    pub const fn fits(self, width: usize) -> bool {
        self.significant_width() <= width
    }

    /// Render as a lamp row, `#` on and `.` off, lamp 0 first.
    #[must_use]
    pub fn render(self, width: usize) -> String {
        (0..width)
            .map(|i| if self.contains(i) { '#' } else { '.' })
            .collect()
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03x}", self.0)
    }
}

impl BitXor for Bits {
    type Output = Bits;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bits(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bits {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

/// A set of switch indices, used as the "already pressed" exclusion set of a
/// search branch.
///
/// `Copy`, so each branch receives its own value and siblings never observe
/// each other's choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwitchSet(u64);

impl SwitchSet {
    pub const CAPACITY: usize = u64::BITS as usize;
    pub const EMPTY: SwitchSet = SwitchSet(0);

    #[must_use]
    pub const fn contains(self, switch: usize) -> bool {
        switch < Self::CAPACITY && self.0 & (1 << switch) != 0
    }

    /// Returns a copy with `switch` added.
    #[must_use]
    pub const fn with(self, switch: usize) -> Self {
        assert!(switch < Self::CAPACITY, "switch index out of range");
        Self(self.0 | (1 << switch))
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Switch indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..Self::CAPACITY).filter(move |&i| self.contains(i))
    }
}

impl FromIterator<usize> for SwitchSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, SwitchSet::with)
    }
}
