use std::iter::FusedIterator;

use crate::{Direction, Quadrant, NUM_CELLS};

/// A compact set of board indices.
///
/// Allows intersection/union with other such sets via bitwise ops.
/// Also implements [`IntoIterator`], yielding the indices in ascending order.
///
/// ```
/// use pentago::CellSet;
/// let set = CellSet::new().insert(14).insert(3).insert(14);
/// assert_eq!(Vec::from_iter(set), vec![3, 14]);
/// ```
///
/// Like [`Board`](crate::Board), this is [`Copy`] and its "mutating" methods
/// return a new value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet {
    // Only the low 36 bits are used.
    bits: u64,
}

impl CellSet {
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, index: usize) -> bool {
        index < NUM_CELLS && self.bits & (1u64 << index) != 0
    }

    #[must_use]
    pub fn insert(self, index: usize) -> Self {
        assert!(index < NUM_CELLS, "cell index {} is out of range", index);
        Self {
            bits: self.bits | (1u64 << index),
        }
    }

    #[must_use]
    pub fn remove(self, index: usize) -> Self {
        assert!(index < NUM_CELLS, "cell index {} is out of range", index);
        Self {
            bits: self.bits & !(1u64 << index),
        }
    }

    /// Applies a quadrant rotation to the members of this set, so that the set
    /// keeps following the markers it was tracking.
    #[must_use]
    pub fn rotated(self, quadrant: Quadrant, direction: Direction) -> Self {
        let cells = quadrant.cells();
        let rotated = direction.rotate_local(cells.map(|idx| self.contains(idx)));
        let mut result = self;
        for (idx, member) in cells.into_iter().zip(rotated) {
            result = if member {
                result.insert(idx)
            } else {
                result.remove(idx)
            };
        }
        result
    }
}

impl std::ops::BitOr for CellSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::ops::BitAnd for CellSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl std::ops::BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl std::fmt::Debug for CellSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl FromIterator<usize> for CellSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        iter.into_iter().fold(CellSet::new(), CellSet::insert)
    }
}

/// Iterator produced by [`CellSet::into_iter()`].
pub struct CellSetIter {
    bits: u64,
}

impl IntoIterator for CellSet {
    type Item = usize;

    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CellSetIter { bits: self.bits }
    }
}

impl Iterator for CellSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            let idx = self.bits.trailing_zeros() as usize;
            // Clear the lowest set bit
            self.bits &= self.bits - 1;
            Some(idx)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for CellSetIter {}

impl FusedIterator for CellSetIter {}

impl From<CellSet> for Vec<bool> {
    fn from(set: CellSet) -> Vec<bool> {
        (0..NUM_CELLS).map(|idx| set.contains(idx)).collect()
    }
}
