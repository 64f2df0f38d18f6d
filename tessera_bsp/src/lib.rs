// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera BSP: an exact-match spatial index over 3D points.
//!
//! [`BspTree`] maps point keys to their positions in a caller-owned key slice. It is meant for
//! jobs like welding duplicate vertices: insert every vertex, then `find` each one to get all
//! slots sharing its position.
//!
//! - Keys are compared x first, then y, then z, with a relative tolerance (see [`classify`]).
//!   Each node has a link per outcome: smaller or larger along each axis, plus an equal chain.
//! - Duplicate keys join the equal chain of the first occurrence and never add height.
//! - With [`Strategy::Balanced`] (the default), insertion rotates subtrees that grow more than
//!   one level taller than their siblings, so sorted input stays shallow.
//! - Node links are small integers ([`NodeIndex`], `u16` by default) whose maximum value means
//!   "no link". Insertion beyond that capacity is refused with [`InsertError::Full`].
//!
//! The node table is a [`tessera_array::SharedArray`], so clones of a tree share it until one
//! of them is modified.
//!
//! # Example
//!
//! ```rust
//! use tessera_bsp::BspTree;
//!
//! let vertices = [
//!     [0.0_f32, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [1.0, 0.0, 0.0],
//! ];
//! let mut tree: BspTree<'_, [f32; 3]> = BspTree::new(&vertices);
//! tree.reserve(vertices.len());
//! for (i, v) in vertices.iter().enumerate() {
//!     tree.insert(v, i).unwrap();
//! }
//!
//! let shared: Vec<usize> = tree.find(&vertices[1]).collect();
//! assert_eq!(shared, [1, 3]);
//! ```
//!
//! ## Features
//!
//! - `glam` (default): implement [`Point3`] for `glam::Vec3`.
//! - `std` (default) and `libm`: forwarded to Glam.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod index;
mod node;
mod partition;
mod point;
mod tree;

pub use error::InsertError;
pub use index::NodeIndex;
pub use node::{Links, Node};
pub use partition::{Axis, Partition, classify, fuzzy_eq};
pub use point::Point3;
pub use tree::{BspTree, Matches, Strategy};
