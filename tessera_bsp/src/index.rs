// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer types usable as node links.

use core::fmt::Debug;
use core::hash::Hash;

/// An unsigned integer used to store node links.
///
/// The maximum value is reserved as the "no link" sentinel, so a tree using `I` holds at most
/// [`CAPACITY`](Self::CAPACITY) nodes. Narrow types keep the node table small: with `u16`
/// (the default) a node record is 14 bytes of links plus a 4-byte height, 20 bytes in all.
pub trait NodeIndex: Copy + Eq + Ord + Hash + Debug + Default + 'static {
    /// The "no link" value.
    const SENTINEL: Self;

    /// Number of usable slots, equal to the sentinel's numeric value.
    const CAPACITY: usize;

    /// Convert a slot number, or `None` if it does not fit below the sentinel.
    fn from_usize(index: usize) -> Option<Self>;

    /// The slot number this link refers to.
    fn to_usize(self) -> usize;

    /// Whether this is the sentinel.
    #[inline]
    fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }

    /// The slot number, or `None` for the sentinel.
    #[inline]
    fn get(self) -> Option<usize> {
        if self.is_sentinel() {
            None
        } else {
            Some(self.to_usize())
        }
    }
}

macro_rules! impl_node_index {
    ($($ty:ty),*) => {$(
        impl NodeIndex for $ty {
            const SENTINEL: Self = <$ty>::MAX;
            #[allow(clippy::cast_possible_truncation, reason = "usize is at least 32 bits on supported targets")]
            const CAPACITY: usize = <$ty>::MAX as usize;

            #[inline]
            fn from_usize(index: usize) -> Option<Self> {
                if index < Self::CAPACITY {
                    Self::try_from(index).ok()
                } else {
                    None
                }
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation, reason = "usize is at least 32 bits on supported targets")]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    )*};
}

impl_node_index!(u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_excluded_from_usable_range() {
        assert_eq!(u8::CAPACITY, 255);
        assert_eq!(u16::CAPACITY, 65_535);
        assert_eq!(u8::from_usize(254), Some(254));
        assert_eq!(u8::from_usize(255), None);
        assert_eq!(u16::from_usize(65_534), Some(65_534));
        assert_eq!(u16::from_usize(65_535), None);
        assert_eq!(u16::from_usize(1 << 20), None);
        assert_eq!(u32::from_usize(7), Some(7));
    }

    #[test]
    fn get_maps_sentinel_to_none() {
        assert_eq!(u16::SENTINEL.get(), None);
        assert_eq!(12_u16.get(), Some(12));
        assert!(u8::MAX.is_sentinel());
    }
}
