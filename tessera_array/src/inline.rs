// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size embedded storage used for short sequences.

use core::fmt::Debug;

/// Inline buffer of `N` slots with a logical length.
///
/// Slots at or beyond `len` always hold `T::default()`, so values removed from the
/// logical range are dropped immediately rather than when the buffer goes away.
#[derive(Clone)]
pub(crate) struct InlineBuf<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Default, const N: usize> InlineBuf<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            items: core::array::from_fn(|_| T::default()),
            len: 0,
        }
    }

    /// Build a buffer from `values`. Callers guarantee `values.len() <= N`.
    pub(crate) fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        debug_assert!(values.len() <= N, "inline buffer overflow");
        let mut buf = Self::new();
        buf.items[..values.len()].clone_from_slice(values);
        buf.len = values.len();
        buf
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }

    /// Push a value. Callers guarantee `len < N`.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(self.len < N, "inline buffer overflow");
        self.items[self.len] = value;
        self.len += 1;
    }

    /// Set the logical length, resetting vacated slots and exposing default-valued new ones.
    pub(crate) fn set_len(&mut self, len: usize) {
        debug_assert!(len <= N, "inline buffer overflow");
        for slot in self.items.iter_mut().take(self.len).skip(len) {
            *slot = T::default();
        }
        self.len = len;
    }

    /// Drain the live elements into a vector with the given capacity.
    pub(crate) fn take_into_vec(&mut self, capacity: usize) -> alloc::vec::Vec<T> {
        let mut out = alloc::vec::Vec::with_capacity(capacity.max(self.len));
        for slot in self.items.iter_mut().take(self.len) {
            out.push(core::mem::take(slot));
        }
        self.len = 0;
        out
    }
}

impl<T: Debug, const N: usize> Debug for InlineBuf<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(&self.items[..self.len]).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn push_and_shrink_reset_vacated_slots() {
        let mut buf: InlineBuf<String, 4> = InlineBuf::new();
        buf.push(String::from("a"));
        buf.push(String::from("b"));
        buf.push(String::from("c"));
        buf.set_len(1);
        assert_eq!(buf.as_slice(), ["a"]);
        // Growing again exposes fresh defaults, not the old values.
        buf.set_len(3);
        assert_eq!(buf.as_slice(), ["a", "", ""]);
    }

    #[test]
    fn take_into_vec_empties_buffer() {
        let mut buf: InlineBuf<u32, 8> = InlineBuf::from_slice(&[1, 2, 3]);
        let v = buf.take_into_vec(16);
        assert_eq!(v, vec![1, 2, 3]);
        assert!(v.capacity() >= 16);
        assert_eq!(buf.len(), 0);
    }
}
