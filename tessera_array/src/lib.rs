// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Array: growable arrays with value semantics and cheap copies.
//!
//! - [`SharedArray`] keeps short sequences inline and moves longer ones to a reference counted
//!   heap block. Copies share the block until one of them is written, at which point only the
//!   writer pays for a copy.
//! - [`SharedArray::from_raw_data`] and [`SharedArray::from_writable_raw_data`] wrap borrowed
//!   memory without copying. The borrow checker keeps that memory alive for as long as the
//!   array looks at it.
//! - [`ArrayRef`] and [`ArrayRefMut`] are windows into an array, produced by
//!   [`SharedArray::mid`], [`left`](SharedArray::left), [`right`](SharedArray::right), and
//!   [`mid_mut`](SharedArray::mid_mut).
//! - [`UnsharedArray`] has the same storage strategy without any sharing, for hot paths that
//!   never hand out copies.
//!
//! Heap capacities follow [`growth::alloc_more`], which doubles from a small base and switches
//! to a page-sized base for large arrays.
//!
//! # Example
//!
//! ```rust
//! use tessera_array::{SharedArray, StorageKind};
//!
//! let vertices = [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
//!
//! // Wrap caller-owned memory; nothing is copied yet.
//! let mut a = SharedArray::<[f32; 3]>::from_raw_data(&vertices);
//! assert_eq!(a.storage_kind(), StorageKind::Borrowed);
//! assert_eq!(a.as_ptr(), vertices.as_ptr());
//!
//! // The first write copies into private storage and leaves `vertices` alone.
//! a.append([0.0, 0.0, 1.0]);
//! assert_eq!(a.len(), 4);
//! assert_eq!(vertices.len(), 3);
//!
//! // Copies are cheap and independent.
//! let b = a.clone();
//! a[0] = [9.0, 9.0, 9.0];
//! assert_eq!(b[0], [0.0, 0.0, 0.0]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod array;
mod array_ref;
pub mod growth;
mod inline;
mod search;
mod unshared;

pub use array::{SharedArray, StorageKind};
pub use array_ref::{ArrayRef, ArrayRefMut};
pub use unshared::UnsharedArray;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn shared_copies_survive_many_writers() {
        let base: SharedArray<'_, u32> = (0..256).collect();
        let mut copies: Vec<_> = (0..4).map(|_| base.clone()).collect();
        for (i, copy) in copies.iter_mut().enumerate() {
            copy[i] = 1000 + u32::try_from(i).unwrap();
        }
        assert!(base.iter().copied().eq(0..256));
        for (i, copy) in copies.iter().enumerate() {
            assert_eq!(copy[i], 1000 + u32::try_from(i).unwrap());
            assert_ne!(copy.as_ptr(), base.as_ptr());
        }
    }

    #[test]
    fn windows_outlive_nothing_they_borrow() {
        let raw = [5_i64, 6, 7, 8];
        let a = SharedArray::<i64>::from_raw_data(&raw);
        let tail = a.right(2);
        assert_eq!(*tail, [7, 8]);
        assert_eq!(tail.as_slice().as_ptr(), raw[2..].as_ptr());
        assert_eq!(tail.to_array(), [7, 8][..]);
    }

    #[test]
    fn unshared_and_shared_interoperate() {
        let mut u: UnsharedArray<u16> = UnsharedArray::new();
        u.extend(0..100);
        let s: SharedArray<'_, u16> = u.into_shared();
        let t = s.clone();
        assert_eq!(s.storage_kind(), StorageKind::Shared);
        assert_eq!(t.to_unshared().len(), 100);
    }
}
