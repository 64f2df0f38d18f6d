// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear search with signed start positions.
//!
//! A negative `from` counts back from the end, so `-1` is the last element.

use crate::array::SharedArray;
use crate::unshared::UnsharedArray;

/// Forward search starting at `from`.
///
/// Negative offsets past the front clamp to `0`; offsets at or past the end find nothing.
pub(crate) fn index_of<T: PartialEq>(items: &[T], value: &T, from: isize) -> Option<usize> {
    let len = items.len();
    let start = if from < 0 {
        len.saturating_sub(from.unsigned_abs())
    } else {
        from.unsigned_abs()
    };
    if start >= len {
        return None;
    }
    items[start..]
        .iter()
        .position(|item| item == value)
        .map(|offset| start + offset)
}

/// Backward search starting at `from`.
///
/// Offsets past the end clamp to the last element; negative offsets past the front find
/// nothing.
pub(crate) fn last_index_of<T: PartialEq>(items: &[T], value: &T, from: isize) -> Option<usize> {
    let len = items.len();
    let start = if from < 0 {
        len.checked_sub(from.unsigned_abs())?
    } else {
        from.unsigned_abs().min(len.checked_sub(1)?)
    };
    items[..=start].iter().rposition(|item| item == value)
}

pub(crate) fn count_of<T: PartialEq>(items: &[T], value: &T) -> usize {
    items.iter().filter(|item| *item == value).count()
}

impl<T: Clone + Default + PartialEq, const N: usize> SharedArray<'_, T, N> {
    /// Index of the first element equal to `value` at or after `from`.
    ///
    /// ```
    /// use tessera_array::SharedArray;
    ///
    /// let a: SharedArray<'_, i32> = [1, 2, 1, 2].into_iter().collect();
    /// assert_eq!(a.index_of(&2, 0), Some(1));
    /// assert_eq!(a.index_of(&2, 2), Some(3));
    /// assert_eq!(a.index_of(&1, -1), None);
    /// assert_eq!(a.index_of(&1, -2), Some(2));
    /// ```
    pub fn index_of(&self, value: &T, from: isize) -> Option<usize> {
        index_of(self.as_slice(), value, from)
    }

    /// Index of the last element equal to `value` at or before `from`; pass `-1` to search
    /// from the end.
    pub fn last_index_of(&self, value: &T, from: isize) -> Option<usize> {
        last_index_of(self.as_slice(), value, from)
    }

    /// Number of elements equal to `value`.
    pub fn count_of(&self, value: &T) -> usize {
        count_of(self.as_slice(), value)
    }
}

impl<T: Clone + Default + PartialEq, const N: usize> UnsharedArray<T, N> {
    /// Index of the first element equal to `value` at or after `from`.
    pub fn index_of(&self, value: &T, from: isize) -> Option<usize> {
        index_of(self.as_slice(), value, from)
    }

    /// Index of the last element equal to `value` at or before `from`.
    pub fn last_index_of(&self, value: &T, from: isize) -> Option<usize> {
        last_index_of(self.as_slice(), value, from)
    }

    /// Number of elements equal to `value`.
    pub fn count_of(&self, value: &T) -> usize {
        count_of(self.as_slice(), value)
    }
}
