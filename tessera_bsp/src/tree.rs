// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree itself: insertion, rebalancing, lookup, and dumps.

use core::fmt;
use core::iter::FusedIterator;

use tessera_array::SharedArray;

use crate::error::InsertError;
use crate::index::NodeIndex;
use crate::node::{Links, Node};
use crate::partition::{Partition, classify};
use crate::point::Point3;

/// Partitions that form tree structure, i.e. everything except the equal chain.
const STRUCTURAL: [Partition; 6] = [
    Partition::LessThanX,
    Partition::GreaterThanX,
    Partition::LessThanY,
    Partition::GreaterThanY,
    Partition::LessThanZ,
    Partition::GreaterThanZ,
];

/// Whether insertion rebalances the tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Rotate after insertions that leave a subtree more than one level taller than its
    /// siblings.
    #[default]
    Balanced,
    /// Never rotate; the shape follows insertion order.
    AdHoc,
}

// One level of the descent: the node visited and the link taken out of it.
#[derive(Copy, Clone, Debug, Default)]
struct Step<I> {
    node: I,
    part: Partition,
}

/// A six-way binary space partition tree over borrowed 3D point keys.
///
/// Node `i` of the tree stands for `keys[i]`; the tree stores only links, never keys. Each
/// node links to children whose keys are smaller or larger along x, or equal in x and
/// smaller or larger along y, or equal in x and y and smaller or larger along z. Keys that
/// compare equal on all three axes form an equal chain hanging off the first of them, so
/// duplicates never add height.
///
/// The node table lives in a [`SharedArray`], so cloning a tree is cheap and the clones only
/// copy the table once one of them is modified.
///
/// ```
/// use tessera_bsp::BspTree;
///
/// let points = [
///     [0.0_f32, 0.0, 0.0],
///     [1.0, 2.0, 3.0],
///     [2.0, 2.0, 3.0],
///     [1.0, 2.0, 3.0],
/// ];
/// let mut tree: BspTree<'_, [f32; 3]> = BspTree::new(&points);
/// for (i, p) in points.iter().enumerate() {
///     tree.insert(p, i).unwrap();
/// }
///
/// let hits: Vec<usize> = tree.find(&[1.0_f32, 2.0, 3.0]).collect();
/// assert_eq!(hits, [1, 3]);
/// assert_eq!(tree.find(&[9.0_f32, 9.0, 9.0]).next(), None);
/// ```
pub struct BspTree<'k, K, I: NodeIndex = u16> {
    keys: &'k [K],
    nodes: SharedArray<'static, Node<I>>,
    root: I,
    max_height: u32,
    strategy: Strategy,
}

impl<K, I: NodeIndex> Clone for BspTree<'_, K, I> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys,
            nodes: self.nodes.clone(),
            root: self.root,
            max_height: self.max_height,
            strategy: self.strategy,
        }
    }
}

impl<K, I: NodeIndex> fmt::Debug for BspTree<'_, K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BspTree")
            .field("keys", &self.keys.len())
            .field("nodes", &self.nodes.len())
            .field("root", &self.root.get())
            .field("height", &self.max_height)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl<'k, K: Point3, I: NodeIndex> BspTree<'k, K, I> {
    /// Create an empty, balancing tree over `keys`.
    pub fn new(keys: &'k [K]) -> Self {
        Self::with_strategy(keys, Strategy::Balanced)
    }

    /// Create an empty tree over `keys` with an explicit [`Strategy`].
    pub fn with_strategy(keys: &'k [K], strategy: Strategy) -> Self {
        Self {
            keys,
            nodes: SharedArray::new(),
            root: I::SENTINEL,
            max_height: 0,
            strategy,
        }
    }

    /// The borrowed key slice.
    pub fn keys(&self) -> &'k [K] {
        self.keys
    }

    /// The balancing strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Number of slots in the node table, including slots skipped by out-of-order inserts.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.root.is_sentinel()
    }

    /// Slot of the root node.
    pub fn root(&self) -> Option<usize> {
        self.root.get()
    }

    /// Height of the tree, ignoring equal chains. Zero when empty.
    pub fn height(&self) -> u32 {
        self.max_height
    }

    /// The record for slot `index`.
    pub fn node(&self, index: usize) -> Option<&Node<I>> {
        self.nodes.get(index)
    }

    /// Make room for `count` nodes in total, so bulk insertion does not reallocate.
    pub fn reserve(&mut self, count: usize) {
        self.nodes.reserve(count);
    }

    /// Insert node `index`, whose key is `point`.
    ///
    /// `point` should equal `keys[index]`. Slots must be inserted in increasing order; slots
    /// skipped over stay in the table as unlinked records. A key equal to one already in the
    /// tree joins the end of that key's equal chain.
    ///
    /// # Errors
    ///
    /// - [`InsertError::Full`] when `index` does not fit below the index type's sentinel.
    /// - [`InsertError::SlotTaken`] when `index` is already in the node table.
    /// - [`InsertError::MissingKey`] when `keys` has no entry `index`.
    ///
    /// The tree is left unchanged when an error is returned.
    pub fn insert<P: Point3 + ?Sized>(
        &mut self,
        point: &P,
        index: usize,
    ) -> Result<(), InsertError> {
        let link = self.admit(index).inspect_err(|err| {
            log::warn!("BspTree refused insertion: {err}");
        })?;
        self.nodes.resize(index);
        self.nodes.append(Node::leaf());

        let Some(root) = self.root.get() else {
            self.root = link;
            self.max_height = 1;
            return Ok(());
        };

        let mut path: SharedArray<'static, Step<I>, 32> = SharedArray::new();
        let mut current = root;
        loop {
            let part = classify(point, &self.keys[current]);
            if part == Partition::EqualTo {
                let mut tail = current;
                while let Some(next) = self.nodes[tail].child(Partition::EqualTo) {
                    tail = next;
                }
                self.nodes[tail].set(Partition::EqualTo, link);
                return Ok(());
            }
            path.append(Step {
                node: self.link_to(current),
                part,
            });
            match self.nodes[current].child(part) {
                Some(next) => current = next,
                None => {
                    self.nodes[current].set(part, link);
                    break;
                }
            }
        }

        self.settle(&path);
        Ok(())
    }

    /// Same as [`insert`](Self::insert); duplicate keys always chain.
    pub fn insert_multi<P: Point3 + ?Sized>(
        &mut self,
        point: &P,
        index: usize,
    ) -> Result<(), InsertError> {
        self.insert(point, index)
    }

    /// All slots whose key equals `point`, in insertion order.
    pub fn find<P: Point3 + ?Sized>(&self, point: &P) -> Matches<'_, I> {
        let mut current = self.root;
        while let Some(index) = current.get() {
            match classify(point, &self.keys[index]) {
                Partition::EqualTo => break,
                part => current = self.nodes[index].link(part),
            }
        }
        Matches {
            nodes: self.nodes.as_slice(),
            current,
        }
    }

    /// Inserted slots and their keys, in table order (not tree order).
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'k K)> + '_ {
        let keys = self.keys;
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.height > 0)
            .map(move |(index, _)| (index, &keys[index]))
    }

    /// Write a human-readable listing of every node and its links.
    pub fn dump<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        log::debug!(
            "dumping BspTree with {} slots, height {}",
            self.nodes.len(),
            self.max_height
        );
        match self.root.get() {
            Some(root) => writeln!(
                out,
                "BspTree: {} slots, root {root}, height {}",
                self.nodes.len(),
                self.max_height
            )?,
            None => writeln!(out, "BspTree: empty")?,
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if node.height == 0 {
                writeln!(out, "Node {index}: unused")?;
                continue;
            }
            let key = &self.keys[index];
            writeln!(
                out,
                "Node {index}: ({:.3}, {:.3}, {:.3}) height {}",
                key.x(),
                key.y(),
                key.z(),
                node.height
            )?;
            for part in Partition::ALL {
                match node.child(part) {
                    Some(child) => writeln!(out, "    {part}: {child}")?,
                    None => writeln!(out, "    {part}: <null>")?,
                }
            }
        }
        Ok(())
    }

    fn admit(&self, index: usize) -> Result<I, InsertError> {
        let Some(link) = I::from_usize(index) else {
            return Err(InsertError::Full {
                index,
                capacity: I::CAPACITY,
            });
        };
        if index < self.nodes.len() {
            return Err(InsertError::SlotTaken {
                index,
                next: self.nodes.len(),
            });
        }
        if index >= self.keys.len() {
            return Err(InsertError::MissingKey {
                index,
                keys: self.keys.len(),
            });
        }
        Ok(link)
    }
}

impl<K, I: NodeIndex> BspTree<'_, K, I> {
    /// The whole node table.
    pub fn nodes(&self) -> &[Node<I>] {
        self.nodes.as_slice()
    }

    // Slots in the table always fit below the sentinel; `admit` checked them.
    fn link_to(&self, index: usize) -> I {
        I::from_usize(index).unwrap_or(I::SENTINEL)
    }

    fn height_of(&self, link: I) -> u32 {
        link.get().map_or(0, |index| self.nodes[index].height)
    }

    fn update_height(&mut self, link: I) {
        let Some(index) = link.get() else {
            return;
        };
        let node = self.nodes[index];
        let tallest = STRUCTURAL
            .iter()
            .map(|part| self.height_of(node.link(*part)))
            .max()
            .unwrap_or(0);
        self.nodes[index].height = tallest + 1;
    }

    // Whether the child of `node` under `part` is more than one level taller than every
    // other structural child of `node`.
    fn is_unbalanced(&self, node: I, part: Partition) -> bool {
        let Some(index) = node.get() else {
            return false;
        };
        let record = self.nodes[index];
        let heavy = self.height_of(record.link(part));
        let others = STRUCTURAL
            .iter()
            .filter(|other| **other != part)
            .map(|other| self.height_of(record.link(*other)))
            .max()
            .unwrap_or(0);
        heavy > others + 1
    }

    // Rotating `node` along `part` keeps every key on the correct side only if `node` has no
    // links on an axis compared before `part`'s axis.
    fn can_rotate(&self, node: I, part: Partition) -> bool {
        let (Some(index), Some(axis)) = (node.get(), part.axis()) else {
            return false;
        };
        let blocked = Links::more_significant_than(axis);
        (self.nodes[index].links() & blocked).is_empty()
            && !self.nodes[index].link(part).is_sentinel()
    }

    // Lift the child of `node` under `part` into `node`'s place and return it. The caller
    // re-points whatever linked to `node`.
    fn rotate(&mut self, node: I, part: Partition) -> I {
        let (Some(index), Some(child)) = (node.get(), self.link_of(node, part).get()) else {
            return node;
        };
        let inner = self.nodes[child].link(part.complement());
        self.nodes[index].set(part, inner);
        self.nodes[child].set(part.complement(), node);
        self.update_height(node);
        let lifted = self.link_to(child);
        self.update_height(lifted);
        lifted
    }

    fn link_of(&self, node: I, part: Partition) -> I {
        node.get()
            .map_or(I::SENTINEL, |index| self.nodes[index].link(part))
    }

    // Rebalance at `grand`, whose path goes `grand -p1-> parent -p2-> ...`. Returns the node
    // now occupying `grand`'s place, or `None` if no valid rotation exists.
    fn rebalance_at(&mut self, grand: Step<I>, parent: Step<I>) -> Option<I> {
        let (p1, p2) = (grand.part, parent.part);
        let same_side = p1.is_less() == p2.is_less();
        if !same_side && self.can_rotate(parent.node, p2) && self.can_rotate(grand.node, p1) {
            let lifted = self.rotate(parent.node, p2);
            if let Some(index) = grand.node.get() {
                self.nodes[index].set(p1, lifted);
            }
            let top = self.rotate(grand.node, p1);
            log::trace!(
                "BspTree double rotation at {:?} via {p1} then {p2}, lifting {:?}",
                grand.node,
                top
            );
            return Some(top);
        }
        if self.can_rotate(grand.node, p1) {
            let top = self.rotate(grand.node, p1);
            log::trace!(
                "BspTree single rotation at {:?} via {p1}, lifting {:?}",
                grand.node,
                top
            );
            return Some(top);
        }
        None
    }

    // Recompute heights bottom-up along `path` and perform at most one rotation, at the
    // deepest unbalanced node.
    fn settle(&mut self, path: &[Step<I>]) {
        let mut rotated = false;
        for depth in (0..path.len()).rev() {
            let grand = path[depth];
            self.update_height(grand.node);
            if rotated || self.strategy == Strategy::AdHoc {
                continue;
            }
            let Some(&parent) = path.get(depth + 1) else {
                continue;
            };
            if !self.is_unbalanced(grand.node, grand.part) {
                continue;
            }
            if let Some(top) = self.rebalance_at(grand, parent) {
                match depth.checked_sub(1).map(|above| path[above]) {
                    Some(above) => {
                        if let Some(index) = above.node.get() {
                            self.nodes[index].set(above.part, top);
                        }
                    }
                    None => self.root = top,
                }
                rotated = true;
            }
        }
        self.max_height = self.height_of(self.root);
    }
}

/// Iterator over the equal chain of a [`BspTree::find`] match.
///
/// Yields slot indices in insertion order and keeps returning `None` once exhausted.
#[derive(Clone)]
pub struct Matches<'t, I: NodeIndex = u16> {
    nodes: &'t [Node<I>],
    current: I,
}

impl<I: NodeIndex> Matches<'_, I> {
    /// The slot the next call to `next` returns, without advancing.
    pub fn current(&self) -> Option<usize> {
        self.current.get()
    }

    /// Whether the chain is exhausted (or nothing matched).
    pub fn is_end(&self) -> bool {
        self.current.is_sentinel()
    }
}

impl<I: NodeIndex> Iterator for Matches<'_, I> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.current.get()?;
        self.current = self.nodes[index].link(Partition::EqualTo);
        Some(index)
    }
}

impl<I: NodeIndex> FusedIterator for Matches<'_, I> {}

impl<I: NodeIndex> fmt::Debug for Matches<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matches")
            .field("current", &self.current.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn build<'k, I: NodeIndex>(
        keys: &'k [[f32; 3]],
        strategy: Strategy,
    ) -> BspTree<'k, [f32; 3], I> {
        let mut tree = BspTree::with_strategy(keys, strategy);
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, i).unwrap();
        }
        tree
    }

    fn collect<K, I: NodeIndex>(tree: &BspTree<'_, K, I>, link: I, out: &mut Vec<usize>) {
        let Some(index) = link.get() else {
            return;
        };
        out.push(index);
        for part in Partition::ALL {
            collect(tree, tree.nodes()[index].link(part), out);
        }
    }

    fn walked_height<K, I: NodeIndex>(tree: &BspTree<'_, K, I>, link: I) -> u32 {
        link.get().map_or(0, |index| {
            let node = tree.nodes()[index];
            1 + STRUCTURAL
                .iter()
                .map(|part| walked_height(tree, node.link(*part)))
                .max()
                .unwrap_or(0)
        })
    }

    // Every key below a link stands in that link's relation to the node, stored heights
    // match the structure, and every inserted slot is reachable exactly once.
    fn check_invariants<K: Point3, I: NodeIndex>(tree: &BspTree<'_, K, I>, inserted: usize) {
        let keys = tree.keys();
        let mut reachable = Vec::new();
        collect(tree, tree.root, &mut reachable);
        let mut sorted = reachable.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), reachable.len(), "a node is linked twice");
        assert_eq!(reachable.len(), inserted);

        for &n in &reachable {
            let node = tree.nodes()[n];
            assert_eq!(node.height(), walked_height(tree, tree.link_to(n)), "height of {n}");
            for part in Partition::ALL {
                let mut below = Vec::new();
                collect(tree, node.link(part), &mut below);
                for d in below {
                    assert_eq!(classify(&keys[d], &keys[n]), part, "node {d} under {n}");
                }
            }
        }
        assert_eq!(tree.height(), walked_height(tree, tree.root));
    }

    struct Rng(u64);

    impl Rng {
        fn next_u64(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn unit(&mut self) -> f32 {
            f32::from(u16::try_from(self.next_u64() >> 48).unwrap()) / 65_536.0
        }

        fn coord(&mut self) -> f32 {
            f32::from(u8::try_from(self.next_u64() % 5).unwrap()) - 2.0
        }
    }

    const MIXED: [[f32; 3]; 10] = [
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 3.0],
        [-1.0, 2.0, 3.0],
        [1.0, -2.0, 3.0],
        [1.0, 2.0, -3.0],
        [1.0, -2.0, -3.0],
        [-1.0, -2.0, 3.0],
        [-1.0, 2.0, 3.0],
        [-1.0, 2.0, -3.0],
        [-1.0, 2.0, 4.0],
    ];

    #[test]
    fn empty_tree() {
        let keys: [[f32; 3]; 0] = [];
        let tree: BspTree<'_, [f32; 3]> = BspTree::new(&keys);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root(), None);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.iter().count(), 0);
        let mut it = tree.find(&[0.0_f32, 0.0, 0.0]);
        assert!(it.is_end());
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn insert_keeps_partition_invariants() {
        for strategy in [Strategy::Balanced, Strategy::AdHoc] {
            let tree = build::<u16>(&MIXED, strategy);
            check_invariants(&tree, MIXED.len());
            assert_eq!(tree.strategy(), strategy);
        }
    }

    #[test]
    fn iter_visits_table_order() {
        let tree = build::<u16>(&MIXED, Strategy::Balanced);
        let visited: Vec<_> = tree.iter().collect();
        assert_eq!(visited.len(), 10);
        for (i, (slot, key)) in visited.into_iter().enumerate() {
            assert_eq!(slot, i);
            assert_eq!(*key, MIXED[i]);
        }
    }

    #[test]
    fn find_single_and_duplicate_keys() {
        let tree = build::<u16>(&MIXED, Strategy::Balanced);

        let mut it = tree.find(&[0.0_f32, 0.0, 0.0]);
        assert_eq!(it.current(), Some(0));
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next(), None);

        assert!(tree.find(&[1.0_f32, 2.0, 3.0]).eq([1]));
        assert!(tree.find(&[-1.0_f32, 2.0, -3.0]).eq([8]));
        assert!(tree.find(&[-1.0_f32, 2.0, 4.0]).eq([9]));

        let mut it = tree.find(&[-1.0_f32, 2.0, 3.0]);
        assert_eq!(it.next(), Some(2));
        assert!(!it.is_end());
        assert_eq!(it.next(), Some(7));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert!(it.is_end());

        assert!(tree.find(&[5.0_f32, 5.0, 5.0]).is_end());
    }

    #[test]
    fn end_to_end_scenario() {
        let keys = [
            [0.0_f32, 0.0, 0.0],
            [1.0, 2.0, 3.0],
            [2.0, 2.0, 3.0],
            [3.0, 2.0, 3.0],
            [4.0, 2.0, 3.0],
            [5.0, 2.0, 3.0],
        ];
        let tree = build::<u16>(&keys, Strategy::Balanced);
        check_invariants(&tree, keys.len());
        assert_eq!(tree.find(&[5.0_f32, 2.0, 3.0]).next(), Some(5));
        assert_eq!(tree.find(&[9.0_f32, 9.0, 9.0]).next(), None);
    }

    #[test]
    fn equal_chain_scenario() {
        let mut keys = [[0.0_f32; 3]; 8];
        for (x, key) in (0_u8..).zip(keys.iter_mut()) {
            *key = [f32::from(x), 1.0, 1.0];
        }
        keys[7] = keys[2];
        let tree = build::<u16>(&keys, Strategy::Balanced);
        let mut it = tree.find(&keys[2]);
        assert_eq!(it.next(), Some(2));
        assert_eq!(it.next(), Some(7));
        assert_eq!(it.next(), None);
        check_invariants(&tree, keys.len());
    }

    #[test]
    fn duplicates_do_not_add_height() {
        let keys = [[1.0_f32, 1.0, 1.0]; 50];
        let tree = build::<u16>(&keys, Strategy::Balanced);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.find(&keys[0]).count(), 50);
        assert!(tree.find(&keys[0]).eq(0..50));
    }

    #[test]
    fn sorted_insertion_stays_shallow() {
        let keys: Vec<[f32; 3]> = (0..10_u8).map(|i| [f32::from(i), 0.0, 0.0]).collect();
        let balanced = build::<u16>(&keys, Strategy::Balanced);
        assert!(balanced.height() < 5, "height {}", balanced.height());
        check_invariants(&balanced, keys.len());

        let adhoc = build::<u16>(&keys, Strategy::AdHoc);
        assert_eq!(adhoc.height(), 10);

        let keys: Vec<[f32; 3]> = (0..1000_u16).map(|i| [f32::from(i), 0.0, 0.0]).collect();
        let big = build::<u16>(&keys, Strategy::Balanced);
        assert!(big.height() <= 14, "height {}", big.height());
        for (i, key) in keys.iter().enumerate() {
            assert!(big.find(key).eq([i]));
        }
    }

    #[test]
    fn sorted_insertion_along_every_axis() {
        let along_y: Vec<[f32; 3]> = (0..64_u8).map(|i| [1.0, f32::from(i), 0.0]).collect();
        let along_z: Vec<[f32; 3]> = (0..64_u8).map(|i| [1.0, 1.0, f32::from(i)]).collect();
        for keys in [along_y, along_z] {
            let tree = build::<u16>(&keys, Strategy::Balanced);
            check_invariants(&tree, keys.len());
            assert!(tree.height() <= 9, "height {}", tree.height());
        }
    }

    #[test]
    fn mixed_axis_insertions_keep_invariants_and_find_everything() {
        let mut rng = Rng(0x2545_F491_4F6C_DD1D);
        let keys: Vec<[f32; 3]> = (0..400)
            .map(|_| [rng.coord(), rng.coord(), rng.coord()])
            .collect();
        let tree = build::<u16>(&keys, Strategy::Balanced);
        check_invariants(&tree, keys.len());
        for key in &keys {
            let expected: Vec<usize> = keys
                .iter()
                .enumerate()
                .filter(|(_, other)| *other == key)
                .map(|(i, _)| i)
                .collect();
            let found: Vec<usize> = tree.find(key).collect();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn grid_in_both_orders() {
        let mut keys = Vec::new();
        for x in 0..12_u8 {
            for y in 0..12_u8 {
                for z in 0..12_u8 {
                    keys.push([f32::from(x), f32::from(y), f32::from(z)]);
                }
            }
        }
        let forward = build::<u16>(&keys, Strategy::Balanced);
        check_invariants(&forward, keys.len());
        for (i, key) in keys.iter().enumerate() {
            assert!(forward.find(key).eq([i]), "forward slot {i}");
        }

        keys.reverse();
        let reversed = build::<u16>(&keys, Strategy::Balanced);
        check_invariants(&reversed, keys.len());
        for (i, key) in keys.iter().enumerate() {
            assert!(reversed.find(key).eq([i]), "reversed slot {i}");
        }
    }

    #[test]
    fn random_floats_are_all_found() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        let keys: Vec<[f32; 3]> = (0..20_000)
            .map(|_| [rng.unit() * 1000.0, rng.unit() * 1000.0, rng.unit() * 1000.0])
            .collect();
        let tree = build::<u16>(&keys, Strategy::Balanced);
        check_invariants(&tree, keys.len());
        for (i, key) in keys.iter().enumerate() {
            assert!(tree.find(key).any(|slot| slot == i), "slot {i}");
        }
    }

    #[test]
    fn default_index_fills_every_usable_slot() {
        let keys: Vec<[f32; 3]> = (0..=u16::MAX)
            .map(|i| {
                [
                    f32::from(i % 41),
                    f32::from((i / 41) % 41),
                    f32::from(i / 1681),
                ]
            })
            .collect();
        let mut tree: BspTree<'_, [f32; 3]> = BspTree::new(&keys);
        tree.reserve(keys.len());
        for (i, key) in keys.iter().enumerate().take(u16::CAPACITY) {
            tree.insert(key, i).unwrap();
        }
        assert_eq!(tree.len(), 65_535);
        assert_eq!(
            tree.insert(&keys[65_535], 65_535),
            Err(InsertError::Full {
                index: 65_535,
                capacity: 65_535
            })
        );
        check_invariants(&tree, 65_535);
        assert!(tree.find(&keys[65_534]).eq([65_534]));
        assert!(tree.find(&keys[65_535]).is_end());
    }

    #[test]
    fn narrow_index_refuses_at_sentinel() {
        let keys: Vec<[f32; 3]> = (0..300_u16).map(|i| [f32::from(i), 0.0, 0.0]).collect();
        let mut tree: BspTree<'_, [f32; 3], u8> = BspTree::new(&keys);
        for i in 0..255 {
            tree.insert(&keys[i], i).unwrap();
        }
        let err = tree.insert(&keys[255], 255).unwrap_err();
        assert_eq!(
            err,
            InsertError::Full {
                index: 255,
                capacity: 255
            }
        );
        assert_eq!(tree.len(), 255);
        assert!(tree.find(&keys[255]).is_end());
        assert!(tree.find(&keys[254]).eq([254]));
        check_invariants(&tree, 255);
    }

    #[test]
    fn skipped_and_repeated_slots() {
        let keys = [
            [0.0_f32, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ];
        let mut tree: BspTree<'_, [f32; 3]> = BspTree::new(&keys);
        tree.insert(&keys[0], 0).unwrap();
        tree.insert(&keys[3], 3).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node(1), Some(&Node::BLANK));
        let slots: Vec<usize> = tree.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, [0, 3]);

        assert_eq!(
            tree.insert(&keys[2], 2),
            Err(InsertError::SlotTaken { index: 2, next: 4 })
        );
        assert_eq!(
            tree.insert(&keys[3], 4),
            Err(InsertError::MissingKey { index: 4, keys: 4 })
        );
        assert!(tree.find(&keys[2]).is_end());
        check_invariants(&tree, 2);
    }

    #[test]
    fn clones_share_until_modified() {
        let keys: Vec<[f32; 3]> = (0..20_u8).map(|i| [f32::from(i), 0.0, 0.0]).collect();
        let mut tree: BspTree<'_, [f32; 3]> = BspTree::new(&keys);
        for i in 0..10 {
            tree.insert(&keys[i], i).unwrap();
        }
        let snapshot = tree.clone();
        assert_eq!(snapshot.nodes().as_ptr(), tree.nodes().as_ptr());
        for i in 10..20 {
            tree.insert_multi(&keys[i], i).unwrap();
        }
        assert_eq!(snapshot.len(), 10);
        assert!(snapshot.find(&keys[15]).is_end());
        assert!(tree.find(&keys[15]).eq([15]));
        check_invariants(&snapshot, 10);
        check_invariants(&tree, 20);
    }

    #[test]
    fn reserve_presizes_node_table() {
        let keys = [[0.0_f32; 3]; 4];
        let mut tree: BspTree<'_, [f32; 3], u32> = BspTree::new(&keys);
        tree.reserve(1000);
        assert!(tree.nodes.capacity() >= 1000);
        assert!(tree.is_empty());
    }

    #[test]
    fn dump_lists_nodes_and_links() {
        let tree = build::<u16>(&MIXED[..3], Strategy::Balanced);
        let mut out = String::new();
        tree.dump(&mut out).unwrap();
        assert!(out.starts_with("BspTree: 3 slots, root 0, height 2"));
        assert!(out.contains("Node 1: (1.000, 2.000, 3.000) height 1"));
        assert!(out.contains("    GreaterThanX: 1"));
        assert!(out.contains("    LessThanX: 2"));
        assert!(out.contains("    EqualTo: <null>"));
    }
}
