// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A growable array that never shares its storage.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::{Deref, DerefMut};

use crate::array::SharedArray;
use crate::growth::alloc_more;
use crate::inline::InlineBuf;

#[derive(Clone)]
enum Buffer<T, const N: usize> {
    Inline(InlineBuf<T, N>),
    Heap(Vec<T>),
}

/// A growable array with the same inline and growth behavior as [`SharedArray`], but no
/// sharing.
///
/// Clones are deep copies and construction from a slice always copies, so writes never
/// check a reference count. Convert with [`into_shared`](Self::into_shared) once the
/// contents are final.
///
/// ```
/// use tessera_array::{StorageKind, UnsharedArray};
///
/// let mut a: UnsharedArray<u8> = UnsharedArray::new();
/// a.append_slice(b"hello, world");
/// let shared = a.into_shared();
/// assert_eq!(shared.storage_kind(), StorageKind::Heap);
/// assert_eq!(&shared[..5], b"hello");
/// ```
#[derive(Clone)]
pub struct UnsharedArray<T, const N: usize = 8> {
    buffer: Buffer<T, N>,
}

impl<T: Clone + Default, const N: usize> UnsharedArray<T, N> {
    /// Create an empty array using the inline buffer.
    pub fn new() -> Self {
        Self {
            buffer: Buffer::Inline(InlineBuf::new()),
        }
    }

    /// Create an array holding `size` copies of `value`.
    pub fn with_value(size: usize, value: T) -> Self {
        let mut array = Self::new();
        array.reserve(size);
        for _ in 0..size {
            array.append(value.clone());
        }
        array
    }

    /// Copy `values` into a new array.
    pub fn from_slice(values: &[T]) -> Self {
        let mut array = Self::new();
        array.append_slice(values);
        array
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match &self.buffer {
            Buffer::Inline(buf) => buf.len(),
            Buffer::Heap(vec) => vec.len(),
        }
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements that fit before the next reallocation.
    pub fn capacity(&self) -> usize {
        match &self.buffer {
            Buffer::Inline(_) => N,
            Buffer::Heap(vec) => vec.capacity(),
        }
    }

    /// View the elements.
    pub fn as_slice(&self) -> &[T] {
        match &self.buffer {
            Buffer::Inline(buf) => buf.as_slice(),
            Buffer::Heap(vec) => vec.as_slice(),
        }
    }

    /// View the elements mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.buffer {
            Buffer::Inline(buf) => buf.as_mut_slice(),
            Buffer::Heap(vec) => vec.as_mut_slice(),
        }
    }

    /// Pointer to the first element.
    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Append one element.
    pub fn append(&mut self, value: T) {
        self.make_room(1);
        match &mut self.buffer {
            Buffer::Inline(buf) => buf.push(value),
            Buffer::Heap(vec) => vec.push(value),
        }
    }

    /// Append clones of all `values`.
    pub fn append_slice(&mut self, values: &[T]) {
        self.make_room(values.len());
        match &mut self.buffer {
            Buffer::Inline(buf) => {
                for value in values {
                    buf.push(value.clone());
                }
            }
            Buffer::Heap(vec) => vec.extend_from_slice(values),
        }
    }

    /// Resize to exactly `size` elements, filling with `T::default()`.
    pub fn resize(&mut self, size: usize) {
        let len = self.len();
        if size > len {
            self.make_room(size - len);
        }
        match &mut self.buffer {
            Buffer::Inline(buf) => buf.set_len(size),
            Buffer::Heap(vec) => vec.resize(size, T::default()),
        }
    }

    /// Ensure room for at least `size` elements.
    pub fn reserve(&mut self, size: usize) {
        if size > self.capacity() {
            self.make_room(size - self.len());
        }
    }

    /// Reduce heap capacity to the current length; an empty array returns to inline storage.
    pub fn squeeze(&mut self) {
        if self.is_empty() {
            self.clear();
        } else if let Buffer::Heap(vec) = &mut self.buffer {
            vec.shrink_to_fit();
        }
    }

    /// Drop all elements and return to inline storage.
    pub fn clear(&mut self) {
        self.buffer = Buffer::Inline(InlineBuf::new());
    }

    /// Hand the storage over to a [`SharedArray`] without copying heap contents.
    pub fn into_shared<'a>(self) -> SharedArray<'a, T, N>
    where
        T: 'a,
    {
        match self.buffer {
            Buffer::Inline(buf) => SharedArray::from_inline(buf),
            Buffer::Heap(vec) => SharedArray::from(vec),
        }
    }

    fn make_room(&mut self, extra: usize) {
        let needed = self.len().saturating_add(extra);
        match &mut self.buffer {
            Buffer::Inline(buf) if needed > N => {
                let vec = buf.take_into_vec(alloc_more(N, extra));
                self.buffer = Buffer::Heap(vec);
            }
            Buffer::Heap(vec) if needed > vec.capacity() => {
                let capacity = alloc_more(vec.capacity(), extra);
                vec.reserve_exact(capacity - vec.len());
            }
            _ => {}
        }
    }
}

impl<T: Clone + Default, const N: usize> Default for UnsharedArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default + Debug, const N: usize> Debug for UnsharedArray<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Clone + Default, const N: usize> Deref for UnsharedArray<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone + Default, const N: usize> DerefMut for UnsharedArray<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone + Default + PartialEq, const N: usize> PartialEq for UnsharedArray<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Clone + Default + Eq, const N: usize> Eq for UnsharedArray<T, N> {}

impl<T: Clone + Default, const N: usize> FromIterator<T> for UnsharedArray<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T: Clone + Default, const N: usize> Extend<T> for UnsharedArray<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T: Clone + Default, const N: usize> From<&SharedArray<'_, T, N>> for UnsharedArray<T, N> {
    fn from(array: &SharedArray<'_, T, N>) -> Self {
        Self::from_slice(array.as_slice())
    }
}

impl<'a, T: Clone + Default + 'a, const N: usize> From<UnsharedArray<T, N>>
    for SharedArray<'a, T, N>
{
    fn from(array: UnsharedArray<T, N>) -> Self {
        array.into_shared()
    }
}
