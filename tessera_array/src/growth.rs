// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capacity growth policy shared by every growing entry point.

/// Element count at which growth switches from the small base to the page base.
pub const PAGE_ELEMENTS: usize = 1 << 12;

/// Smallest heap capacity handed out by [`alloc_more`].
pub const MIN_HEAP_CAPACITY: usize = 64;

/// Largest capacity the policy will ever return.
pub const MAX_CAPACITY: usize = isize::MAX as usize;

/// Compute the capacity to allocate when `extra` more slots are needed on top of `alloc`.
///
/// Starting from [`MIN_HEAP_CAPACITY`] (or [`PAGE_ELEMENTS`] once the request reaches a page),
/// the result doubles until it covers `alloc + extra`. Requests that would overflow saturate
/// at [`MAX_CAPACITY`]. Returns `0` only when both arguments are `0`.
///
/// ```
/// use tessera_array::growth::alloc_more;
///
/// assert_eq!(alloc_more(0, 0), 0);
/// assert_eq!(alloc_more(8, 1), 64);
/// assert_eq!(alloc_more(64, 1), 128);
/// assert_eq!(alloc_more(4096, 1), 8192);
/// ```
pub const fn alloc_more(alloc: usize, extra: usize) -> usize {
    if alloc == 0 && extra == 0 {
        return 0;
    }
    let wanted = match alloc.checked_add(extra) {
        Some(w) if w <= MAX_CAPACITY / 2 => w,
        _ => return MAX_CAPACITY,
    };
    let mut capacity = if wanted < PAGE_ELEMENTS {
        MIN_HEAP_CAPACITY
    } else {
        PAGE_ELEMENTS
    };
    while capacity < wanted {
        capacity *= 2;
    }
    capacity
}
