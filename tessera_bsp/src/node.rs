// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size node records stored in the tree's node table.

use bitflags::bitflags;

use crate::index::NodeIndex;
use crate::partition::{Axis, Partition};

bitflags! {
    /// Set of occupied links of a node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Links: u8 {
        /// The equal chain continues.
        const EQUAL_TO       = 0b0000_0001;
        /// Child with a smaller x.
        const LESS_THAN_X    = 0b0000_0010;
        /// Child with a larger x.
        const GREATER_THAN_X = 0b0000_0100;
        /// Child with equal x and a smaller y.
        const LESS_THAN_Y    = 0b0000_1000;
        /// Child with equal x and a larger y.
        const GREATER_THAN_Y = 0b0001_0000;
        /// Child with equal x and y and a smaller z.
        const LESS_THAN_Z    = 0b0010_0000;
        /// Child with equal x and y and a larger z.
        const GREATER_THAN_Z = 0b0100_0000;

        /// Both x links.
        const X = Self::LESS_THAN_X.bits() | Self::GREATER_THAN_X.bits();
        /// Both y links.
        const Y = Self::LESS_THAN_Y.bits() | Self::GREATER_THAN_Y.bits();
        /// Both z links.
        const Z = Self::LESS_THAN_Z.bits() | Self::GREATER_THAN_Z.bits();
        /// Every link that forms tree structure, i.e. all but `EQUAL_TO`.
        const STRUCTURAL = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

impl Links {
    /// The flag for a single partition's link.
    pub const fn of(part: Partition) -> Self {
        Self::from_bits_truncate(1_u8 << part.index())
    }

    /// Links on axes compared before `axis`.
    pub const fn more_significant_than(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::empty(),
            Axis::Y => Self::X,
            Axis::Z => Self::X.union(Self::Y),
        }
    }
}

/// One record of the node table: seven links and the height of the subtree below.
///
/// Record `i` describes the key at position `i` of the tree's key slice. A record that was
/// skipped over by an out-of-order insertion keeps every link at the sentinel and is never
/// reachable from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node<I: NodeIndex = u16> {
    pub(crate) next: [I; Partition::COUNT],
    pub(crate) height: u32,
}

impl<I: NodeIndex> Default for Node<I> {
    fn default() -> Self {
        Self::BLANK
    }
}

impl<I: NodeIndex> Node<I> {
    /// A record with every link empty and no height.
    pub const BLANK: Self = Self {
        next: [I::SENTINEL; Partition::COUNT],
        height: 0,
    };

    pub(crate) const fn leaf() -> Self {
        Self {
            next: [I::SENTINEL; Partition::COUNT],
            height: 1,
        }
    }

    /// The slot linked under `part`, if any.
    #[inline]
    pub fn child(&self, part: Partition) -> Option<usize> {
        self.next[part.index()].get()
    }

    /// Raw link value under `part`; the sentinel when empty.
    #[inline]
    pub fn link(&self, part: Partition) -> I {
        self.next[part.index()]
    }

    /// Height of the subtree rooted here, counting this node, ignoring equal chains.
    ///
    /// Zero for records not in the tree.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Which links are occupied.
    pub fn links(&self) -> Links {
        Partition::ALL
            .iter()
            .filter(|part| !self.next[part.index()].is_sentinel())
            .fold(Links::empty(), |acc, part| acc | Links::of(*part))
    }

    /// Number of occupied structural links (the equal chain is not counted).
    pub fn branching_factor(&self) -> usize {
        (self.links() & Links::STRUCTURAL).bits().count_ones() as usize
    }

    #[inline]
    pub(crate) fn set(&mut self, part: Partition, link: I) {
        self.next[part.index()] = link;
    }
}
