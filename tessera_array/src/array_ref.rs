// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed windows into a [`SharedArray`].

use core::fmt::Debug;
use core::ops::{Deref, DerefMut, Range};

use crate::array::SharedArray;

fn clamp_range(len: usize, offset: usize, length: usize) -> Range<usize> {
    let start = offset.min(len);
    let end = start.saturating_add(length).min(len);
    start..end
}

/// A read-only window of consecutive elements in a [`SharedArray`].
///
/// The window does not copy anything. A null reference (no array at all) reads as empty
/// and compares equal to any other empty window.
pub struct ArrayRef<'r, 'a, T, const N: usize = 8> {
    array: Option<&'r SharedArray<'a, T, N>>,
    offset: usize,
    len: usize,
}

impl<'r, 'a, T: Clone + Default, const N: usize> ArrayRef<'r, 'a, T, N> {
    /// A reference to no array.
    pub const fn null() -> Self {
        Self {
            array: None,
            offset: 0,
            len: 0,
        }
    }

    /// A window over all of `array`.
    pub fn new(array: &'r SharedArray<'a, T, N>) -> Self {
        Self {
            array: Some(array),
            offset: 0,
            len: array.len(),
        }
    }

    /// A window over `length` elements of `array` starting at `offset`.
    ///
    /// The range is clamped to the array.
    pub fn with_range(array: &'r SharedArray<'a, T, N>, offset: usize, length: usize) -> Self {
        let range = clamp_range(array.len(), offset, length);
        Self {
            array: Some(array),
            offset: range.start,
            len: range.len(),
        }
    }

    /// Whether this reference points at no array.
    pub fn is_null(&self) -> bool {
        self.array.is_none()
    }

    /// Number of elements in the window.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the window's first element in the underlying array.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The array this window looks into.
    pub fn array(&self) -> Option<&'r SharedArray<'a, T, N>> {
        self.array
    }

    /// Element `index` of the window.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the window.
    pub fn at(&self, index: usize) -> &'r T {
        assert!(index < self.len, "ArrayRef::at: index out of range");
        &self.as_slice()[index]
    }

    /// The window's elements.
    pub fn as_slice(&self) -> &'r [T] {
        match self.array {
            Some(array) => &array.as_slice()[self.offset..self.offset + self.len],
            None => &[],
        }
    }

    /// An owned array with the window's elements.
    ///
    /// A window over a whole array shares that array's storage instead of copying.
    pub fn to_array(&self) -> SharedArray<'a, T, N> {
        match self.array {
            None => SharedArray::new(),
            Some(array) if self.offset == 0 && self.len == array.len() => array.clone(),
            Some(array) => {
                SharedArray::from(&array.as_slice()[self.offset..self.offset + self.len])
            }
        }
    }
}

impl<T, const N: usize> Clone for ArrayRef<'_, '_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for ArrayRef<'_, '_, T, N> {}

impl<T: Clone + Default, const N: usize> Default for ArrayRef<'_, '_, T, N> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: Clone + Default, const N: usize> Deref for ArrayRef<'_, '_, T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone + Default + Debug, const N: usize> Debug for ArrayRef<'_, '_, T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArrayRef")
            .field("offset", &self.offset)
            .field("items", &self.as_slice())
            .finish()
    }
}

impl<T: Clone + Default + PartialEq, const N: usize> PartialEq for ArrayRef<'_, '_, T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'r, 'a, T: Clone + Default, const N: usize> From<&'r SharedArray<'a, T, N>>
    for ArrayRef<'r, 'a, T, N>
{
    fn from(array: &'r SharedArray<'a, T, N>) -> Self {
        Self::new(array)
    }
}

/// A writable window of consecutive elements in a [`SharedArray`].
///
/// Reads never detach. The first write detaches the underlying array.
pub struct ArrayRefMut<'r, 'a, T, const N: usize = 8> {
    array: &'r mut SharedArray<'a, T, N>,
    offset: usize,
    len: usize,
}

impl<'r, 'a, T: Clone + Default, const N: usize> ArrayRefMut<'r, 'a, T, N> {
    /// A writable window over `length` elements of `array` starting at `offset` (clamped).
    pub fn with_range(array: &'r mut SharedArray<'a, T, N>, offset: usize, length: usize) -> Self {
        let range = clamp_range(array.len(), offset, length);
        Self {
            array,
            offset: range.start,
            len: range.len(),
        }
    }

    /// Number of elements in the window.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the window's first element in the underlying array.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The window's elements, without detaching.
    pub fn as_slice(&self) -> &[T] {
        &self.array.as_slice()[self.offset..self.offset + self.len]
    }

    /// The window's elements for writing; detaches the underlying array.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let range = self.offset..self.offset + self.len;
        &mut self.array.as_mut_slice()[range]
    }

    /// An owned copy of the window's elements.
    pub fn to_array(&self) -> SharedArray<'a, T, N> {
        SharedArray::from(self.as_slice())
    }
}

impl<T: Clone + Default, const N: usize> Deref for ArrayRefMut<'_, '_, T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone + Default, const N: usize> DerefMut for ArrayRefMut<'_, '_, T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone + Default + Debug, const N: usize> Debug for ArrayRefMut<'_, '_, T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArrayRefMut")
            .field("offset", &self.offset)
            .field("items", &self.as_slice())
            .finish()
    }
}
