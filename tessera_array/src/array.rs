// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The implicitly shared, copy-on-write [`SharedArray`].

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::{Deref, DerefMut};

use crate::array_ref::{ArrayRef, ArrayRefMut};
use crate::growth::alloc_more;
use crate::inline::InlineBuf;
use crate::unshared::UnsharedArray;

/// Kind of storage currently backing a [`SharedArray`].
///
/// Mostly useful for diagnostics and tests; the array moves between kinds on its own
/// as it grows, is cloned, or is mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Elements live in the buffer embedded in the array value.
    Inline,
    /// Elements live in a heap block owned by this array alone.
    Heap,
    /// Elements live in a heap block that another array also references.
    Shared,
    /// Elements live in borrowed, read-only memory.
    Borrowed,
    /// Elements live in borrowed memory that may be written in place.
    BorrowedMut,
}

enum Storage<'a, T, const N: usize> {
    Inline(InlineBuf<T, N>),
    // Exclusively owned when the strong count is 1, shared otherwise.
    Heap(Arc<Vec<T>>),
    Borrowed(&'a [T]),
    BorrowedMut { data: &'a mut [T], len: usize },
}

/// A growable array with value semantics and copy-on-write sharing.
///
/// - Up to `N` elements (default 8) are stored inline, without touching the heap.
/// - Longer contents move to a reference counted heap block. Cloning the array shares that
///   block; the first mutation through either handle copies it for that handle only.
/// - [`from_raw_data`](Self::from_raw_data) wraps borrowed memory read-only. Reads go straight
///   to the borrowed slice and the first mutation copies it into private storage.
/// - [`from_writable_raw_data`](Self::from_writable_raw_data) wraps borrowed memory for in-place
///   writes as long as the length stays within the borrowed slice.
///
/// Every mutating entry point (including [`DerefMut`] and indexing through it) detaches
/// first, so a shared block or borrowed slice is never written behind another owner's back.
///
/// ```
/// use tessera_array::{SharedArray, StorageKind};
///
/// let mut a: SharedArray<'_, u32> = (0..100).collect();
/// let b = a.clone();
/// assert_eq!(a.as_ptr(), b.as_ptr());
/// assert_eq!(b.storage_kind(), StorageKind::Shared);
///
/// a[0] = 42;
/// assert_ne!(a.as_ptr(), b.as_ptr());
/// assert_eq!((a[0], b[0]), (42, 0));
/// ```
pub struct SharedArray<'a, T, const N: usize = 8> {
    storage: Storage<'a, T, N>,
}

impl<'a, T: Clone + Default, const N: usize> SharedArray<'a, T, N> {
    /// Create an empty array using the inline buffer.
    pub fn new() -> Self {
        Self {
            storage: Storage::Inline(InlineBuf::new()),
        }
    }

    /// Create an array holding `size` copies of `value`.
    pub fn with_value(size: usize, value: T) -> Self {
        if size <= N {
            let mut buf = InlineBuf::new();
            for _ in 0..size {
                buf.push(value.clone());
            }
            return Self::from_inline(buf);
        }
        let mut vec = Vec::with_capacity(alloc_more(size, 0));
        vec.resize(size, value);
        Self {
            storage: Storage::Heap(Arc::new(vec)),
        }
    }

    /// Wrap borrowed memory without copying it.
    ///
    /// The slice is only ever read. The first mutating call copies the contents into
    /// private storage and leaves `data` untouched.
    pub fn from_raw_data(data: &'a [T]) -> Self {
        Self {
            storage: Storage::Borrowed(data),
        }
    }

    /// Wrap borrowed memory that may be modified in place.
    ///
    /// Writes, shrinking, and appending back up to `data.len()` elements all happen inside
    /// `data`. Growing or reserving beyond `data.len()` copies the contents into private
    /// storage; later changes no longer reach `data`.
    pub fn from_writable_raw_data(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            storage: Storage::BorrowedMut { data, len },
        }
    }

    pub(crate) fn from_inline(buf: InlineBuf<T, N>) -> Self {
        Self {
            storage: Storage::Inline(buf),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Inline(buf) => buf.len(),
            Storage::Heap(block) => block.len(),
            Storage::Borrowed(data) => data.len(),
            Storage::BorrowedMut { len, .. } => *len,
        }
    }

    /// Whether the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements the current storage can hold before it must grow or copy.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(_) => N,
            Storage::Heap(block) => block.capacity(),
            Storage::Borrowed(data) => data.len(),
            Storage::BorrowedMut { data, .. } => data.len(),
        }
    }

    /// Whether a mutation can proceed without copying the current storage first.
    pub fn is_detached(&self) -> bool {
        match &self.storage {
            Storage::Inline(_) | Storage::BorrowedMut { .. } => true,
            Storage::Heap(block) => Arc::strong_count(block) == 1,
            Storage::Borrowed(_) => false,
        }
    }

    /// Kind of storage currently backing the array.
    pub fn storage_kind(&self) -> StorageKind {
        match &self.storage {
            Storage::Inline(_) => StorageKind::Inline,
            Storage::Heap(block) if Arc::strong_count(block) == 1 => StorageKind::Heap,
            Storage::Heap(_) => StorageKind::Shared,
            Storage::Borrowed(_) => StorageKind::Borrowed,
            Storage::BorrowedMut { .. } => StorageKind::BorrowedMut,
        }
    }

    /// View the elements without detaching.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Inline(buf) => buf.as_slice(),
            Storage::Heap(block) => block.as_slice(),
            Storage::Borrowed(data) => data,
            Storage::BorrowedMut { data, len } => &data[..*len],
        }
    }

    /// Pointer to the first element of the current storage, without detaching.
    ///
    /// Two arrays sharing a heap block or wrapping the same borrowed memory report the
    /// same pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    /// Detach if needed, then view the elements mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.ensure_unique_writable(0);
        match &mut self.storage {
            Storage::Inline(buf) => buf.as_mut_slice(),
            Storage::Heap(block) => Arc::make_mut(block).as_mut_slice(),
            Storage::BorrowedMut { data, len } => &mut data[..*len],
            Storage::Borrowed(_) => unreachable!("writable storage is never read-only"),
        }
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn at(&self, index: usize) -> &T {
        assert!(index < self.len(), "SharedArray::at: index out of range");
        &self.as_slice()[index]
    }

    /// Clone of the element at `index`, or `T::default()` when out of range.
    pub fn value(&self, index: usize) -> T {
        self.as_slice().get(index).cloned().unwrap_or_default()
    }

    /// Clone of the element at `index`, or `default` when out of range.
    pub fn value_or(&self, index: usize, default: T) -> T {
        self.as_slice().get(index).cloned().unwrap_or(default)
    }

    /// Append one element.
    pub fn append(&mut self, value: T) {
        self.ensure_unique_writable(1);
        self.push_reserved(value);
    }

    /// Append clones of all `values`.
    pub fn append_slice(&mut self, values: &[T]) {
        if values.is_empty() {
            return;
        }
        self.ensure_unique_writable(values.len());
        match &mut self.storage {
            Storage::Heap(block) => Arc::make_mut(block).extend_from_slice(values),
            Storage::BorrowedMut { data, len } => {
                data[*len..*len + values.len()].clone_from_slice(values);
                *len += values.len();
            }
            _ => {
                for value in values {
                    self.push_reserved(value.clone());
                }
            }
        }
    }

    /// Append clones of every element of `other`.
    pub fn append_array<'b>(&mut self, other: &SharedArray<'b, T, N>) {
        self.append_slice(other.as_slice());
    }

    /// Extend by `count` default-valued elements and return them for initialization.
    pub fn grow_by(&mut self, count: usize) -> &mut [T] {
        let len = self.len();
        self.resize(len.saturating_add(count));
        &mut self.as_mut_slice()[len..]
    }

    /// Insert `value` before the element at `index`; indices past the end append.
    pub fn insert(&mut self, index: usize, value: T) {
        let index = index.min(self.len());
        self.ensure_unique_writable(1);
        self.push_reserved(value);
        self.as_mut_slice()[index..].rotate_right(1);
    }

    /// Insert `count` clones of `value` before the element at `index`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) {
        if count == 0 {
            return;
        }
        let index = index.min(self.len());
        self.ensure_unique_writable(count);
        for _ in 0..count {
            self.push_reserved(value.clone());
        }
        self.as_mut_slice()[index..].rotate_right(count);
    }

    /// Overwrite elements starting at `index` with `values`, growing the array if the range
    /// runs past the end.
    pub fn replace(&mut self, index: usize, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let end = index.saturating_add(values.len());
        if end > self.len() {
            self.resize(end);
        }
        self.as_mut_slice()[index..end].clone_from_slice(values);
    }

    /// Remove `count` elements starting at `index`.
    ///
    /// The range is clamped to the array; removing everything returns the array to the
    /// empty inline state.
    pub fn remove(&mut self, index: usize, count: usize) {
        let len = self.len();
        if index >= len {
            return;
        }
        let count = count.min(len - index);
        if count == 0 {
            return;
        }
        if index == 0 && count == len {
            self.clear();
            return;
        }
        self.as_mut_slice()[index..].rotate_left(count);
        self.truncate_private(len - count);
    }

    /// Remove the element at `index`, if any.
    pub fn remove_at(&mut self, index: usize) {
        self.remove(index, 1);
    }

    /// Remove the first element, if any.
    pub fn remove_first(&mut self) {
        self.remove(0, 1);
    }

    /// Remove the last element, if any.
    pub fn remove_last(&mut self) {
        if let Some(last) = self.len().checked_sub(1) {
            self.remove(last, 1);
        }
    }

    /// Resize to exactly `size` elements.
    ///
    /// New elements are `T::default()`. Shrinking drops the trailing elements but keeps the
    /// capacity; call [`clear`](Self::clear) or [`squeeze`](Self::squeeze) to release storage.
    pub fn resize(&mut self, size: usize) {
        let len = self.len();
        if size < len {
            self.ensure_unique_writable(0);
            self.truncate_private(size);
        } else if size > len {
            self.ensure_unique_writable(size - len);
            match &mut self.storage {
                Storage::Inline(buf) => buf.set_len(size),
                Storage::Heap(block) => Arc::make_mut(block).resize(size, T::default()),
                Storage::BorrowedMut { data, len } => {
                    data[*len..size].fill(T::default());
                    *len = size;
                }
                Storage::Borrowed(_) => unreachable!("writable storage is never read-only"),
            }
        }
    }

    /// Ensure room for at least `size` elements without changing the length.
    ///
    /// Never shrinks. Reserving past the end of borrowed memory copies it.
    pub fn reserve(&mut self, size: usize) {
        if size > self.capacity() {
            self.ensure_unique_writable(size.saturating_sub(self.len()));
        }
    }

    /// Reduce the capacity to the current length.
    ///
    /// Inline and borrowed storage are left as they are.
    pub fn squeeze(&mut self) {
        self.squeeze_to(self.len());
    }

    /// Truncate to at most `size` elements and reduce the capacity to `size`.
    ///
    /// `squeeze_to(0)` is the same as [`clear`](Self::clear).
    pub fn squeeze_to(&mut self, size: usize) {
        if size == 0 {
            self.clear();
            return;
        }
        if size >= self.capacity() {
            return;
        }
        if size < self.len() {
            self.resize(size);
        }
        if let Storage::Heap(block) = &mut self.storage {
            match Arc::get_mut(block) {
                Some(vec) => vec.shrink_to(size),
                None => {
                    let mut vec = Vec::with_capacity(size);
                    vec.extend_from_slice(block);
                    *block = Arc::new(vec);
                }
            }
            log::trace!("SharedArray squeezed to capacity {}", block.capacity());
        }
    }

    /// Drop all elements and return to the empty inline state.
    pub fn clear(&mut self) {
        self.storage = Storage::Inline(InlineBuf::new());
    }

    /// Reverse the elements in place.
    pub fn reverse(&mut self) {
        if self.len() > 1 {
            self.as_mut_slice().reverse();
        }
    }

    /// A new array holding the elements in reverse order.
    pub fn reversed(&self) -> Self {
        self.as_slice().iter().rev().cloned().collect()
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        if !self.is_empty() {
            self.as_mut_slice().fill(value);
        }
    }

    /// Resize to `size` elements, all set to `value`.
    pub fn fill_to(&mut self, value: T, size: usize) {
        self.resize(size);
        self.fill(value);
    }

    /// A view of `length` elements starting at `index`, without copying.
    ///
    /// Both arguments are clamped: `index` to the length and `length` to the remaining
    /// elements, so `usize::MAX` selects everything from `index` onward.
    pub fn mid(&self, index: usize, length: usize) -> ArrayRef<'_, 'a, T, N> {
        ArrayRef::with_range(self, index, length)
    }

    /// A view of the first `length` elements (clamped).
    pub fn left(&self, length: usize) -> ArrayRef<'_, 'a, T, N> {
        ArrayRef::with_range(self, 0, length)
    }

    /// A view of the last `length` elements (clamped).
    pub fn right(&self, length: usize) -> ArrayRef<'_, 'a, T, N> {
        let len = self.len();
        let length = length.min(len);
        ArrayRef::with_range(self, len - length, length)
    }

    /// A mutable view of `length` elements starting at `index` (clamped like [`mid`](Self::mid)).
    ///
    /// Writing through the view detaches this array; reading does not.
    pub fn mid_mut(&mut self, index: usize, length: usize) -> ArrayRefMut<'_, 'a, T, N> {
        ArrayRefMut::with_range(self, index, length)
    }

    /// Copy the elements into a non-shareable array.
    pub fn to_unshared(&self) -> UnsharedArray<T, N> {
        UnsharedArray::from_slice(self.as_slice())
    }

    /// Make the storage private and writable with room for `extra` more elements.
    ///
    /// This is the only place that decides whether to copy. Shared heap blocks are copied
    /// with their capacity preserved, borrowed slices are copied into inline or heap storage,
    /// and inline or exclusive heap storage grows by [`alloc_more`] when too small.
    fn ensure_unique_writable(&mut self, extra: usize) {
        let needed = self.len().saturating_add(extra);
        match &mut self.storage {
            Storage::Inline(buf) => {
                if needed > N {
                    let vec = buf.take_into_vec(alloc_more(N, extra));
                    log::trace!(
                        "SharedArray moved from inline to heap (capacity {})",
                        vec.capacity()
                    );
                    self.storage = Storage::Heap(Arc::new(vec));
                }
            }
            Storage::Heap(block) => match Arc::get_mut(block) {
                Some(vec) => {
                    if needed > vec.capacity() {
                        let capacity = alloc_more(vec.capacity(), extra);
                        vec.reserve_exact(capacity - vec.len());
                        log::trace!("SharedArray grew to capacity {}", vec.capacity());
                    }
                }
                None => {
                    let capacity = if needed > block.capacity() {
                        alloc_more(block.capacity(), extra)
                    } else {
                        block.capacity()
                    };
                    let mut vec = Vec::with_capacity(capacity);
                    vec.extend_from_slice(block);
                    log::trace!("SharedArray detached from shared block ({} elements)", vec.len());
                    *block = Arc::new(vec);
                }
            },
            Storage::BorrowedMut { data, .. } if needed <= data.len() => {}
            Storage::Borrowed(_) | Storage::BorrowedMut { .. } => {
                self.storage = Self::private_copy(self.as_slice(), extra);
                log::trace!("SharedArray copied borrowed data ({} elements)", self.len());
            }
        }
    }

    fn private_copy(values: &[T], extra: usize) -> Storage<'a, T, N> {
        if values.len().saturating_add(extra) <= N {
            return Storage::Inline(InlineBuf::from_slice(values));
        }
        let mut vec = Vec::with_capacity(alloc_more(values.len(), extra));
        vec.extend_from_slice(values);
        Storage::Heap(Arc::new(vec))
    }

    // Callers have already made room through `ensure_unique_writable`.
    fn push_reserved(&mut self, value: T) {
        match &mut self.storage {
            Storage::Inline(buf) => buf.push(value),
            Storage::Heap(block) => Arc::make_mut(block).push(value),
            Storage::BorrowedMut { data, len } => {
                data[*len] = value;
                *len += 1;
            }
            Storage::Borrowed(_) => unreachable!("writable storage is never read-only"),
        }
    }

    // Callers have already made the storage private.
    fn truncate_private(&mut self, size: usize) {
        match &mut self.storage {
            Storage::Inline(buf) => buf.set_len(size),
            Storage::Heap(block) => Arc::make_mut(block).truncate(size),
            Storage::BorrowedMut { len, .. } => *len = size,
            Storage::Borrowed(_) => unreachable!("writable storage is never read-only"),
        }
    }
}

impl<T: Clone + Default, const N: usize> Default for SharedArray<'_, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Clone + Default, const N: usize> Clone for SharedArray<'a, T, N> {
    /// Inline contents are copied, heap blocks and read-only borrowed memory are shared.
    /// Writable borrowed memory cannot be aliased, so its contents are copied.
    fn clone(&self) -> Self {
        let storage = match &self.storage {
            Storage::Inline(buf) => Storage::Inline(buf.clone()),
            Storage::Heap(block) => Storage::Heap(Arc::clone(block)),
            Storage::Borrowed(data) => Storage::Borrowed(*data),
            Storage::BorrowedMut { data, len } => Self::private_copy(&data[..*len], 0),
        };
        Self { storage }
    }
}

impl<T: Clone + Default + Debug, const N: usize> Debug for SharedArray<'_, T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Clone + Default, const N: usize> Deref for SharedArray<'_, T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone + Default, const N: usize> DerefMut for SharedArray<'_, T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone + Default, const N: usize> AsRef<[T]> for SharedArray<'_, T, N> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<'b, T: Clone + Default + PartialEq, const N: usize> PartialEq<SharedArray<'b, T, N>>
    for SharedArray<'_, T, N>
{
    fn eq(&self, other: &SharedArray<'b, T, N>) -> bool {
        if self.len() != other.len() {
            return false;
        }
        core::ptr::eq(self.as_ptr(), other.as_ptr()) || self.as_slice() == other.as_slice()
    }
}

impl<T: Clone + Default + Eq, const N: usize> Eq for SharedArray<'_, T, N> {}

impl<T: Clone + Default + PartialEq, const N: usize> PartialEq<[T]> for SharedArray<'_, T, N> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Clone + Default, const N: usize> From<Vec<T>> for SharedArray<'_, T, N> {
    /// Adopt the vector's allocation without copying.
    fn from(vec: Vec<T>) -> Self {
        if vec.is_empty() {
            return Self::new();
        }
        Self {
            storage: Storage::Heap(Arc::new(vec)),
        }
    }
}

impl<T: Clone + Default, const N: usize> From<&[T]> for SharedArray<'_, T, N> {
    /// Copy the slice into private storage.
    fn from(values: &[T]) -> Self {
        Self {
            storage: Self::private_copy(values, 0),
        }
    }
}

impl<T: Clone + Default, const N: usize> FromIterator<T> for SharedArray<'_, T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T: Clone + Default, const N: usize> Extend<T> for SharedArray<'_, T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > 0 {
            self.ensure_unique_writable(lower);
        }
        for value in iter {
            self.append(value);
        }
    }
}

impl<'s, T: Clone + Default, const N: usize> IntoIterator for &'s SharedArray<'_, T, N> {
    type Item = &'s T;
    type IntoIter = core::slice::Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}
