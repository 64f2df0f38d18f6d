// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`BspTree::insert`](crate::BspTree::insert).

use core::fmt;

/// Why an insertion was refused. The tree is unchanged in every case.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertError {
    /// The slot does not fit below the node index sentinel.
    Full {
        /// The requested slot.
        index: usize,
        /// Number of usable slots for the tree's index type.
        capacity: usize,
    },
    /// The slot is already part of the node table.
    SlotTaken {
        /// The requested slot.
        index: usize,
        /// First slot that may still be inserted.
        next: usize,
    },
    /// The slot has no key in the tree's key slice.
    MissingKey {
        /// The requested slot.
        index: usize,
        /// Length of the key slice.
        keys: usize,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { index, capacity } => write!(
                f,
                "node index {index} exceeds the tree capacity of {capacity} nodes"
            ),
            Self::SlotTaken { index, next } => write!(
                f,
                "node index {index} is already in the table (next free slot is {next})"
            ),
            Self::MissingKey { index, keys } => {
                write!(f, "node index {index} has no key ({keys} keys)")
            }
        }
    }
}

impl core::error::Error for InsertError {}
