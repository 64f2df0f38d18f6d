// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex welding.
//!
//! Index the corners of a triangle soup, then map every corner to the first corner sharing
//! its position and rebuild a compact vertex list.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p tessera_demos --example weld_vertices`

use glam::Vec3;
use tessera_array::SharedArray;
use tessera_bsp::{BspTree, Strategy};

// Two unit quads side by side, each split into two triangles.
fn quad_strip() -> Vec<Vec3> {
    let mut soup = Vec::new();
    for i in 0..2 {
        let x = i as f32;
        let (a, b) = (Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 0.0, 0.0));
        let (c, d) = (Vec3::new(x + 1.0, 1.0, 0.0), Vec3::new(x, 1.0, 0.0));
        soup.extend_from_slice(&[a, b, c, a, c, d]);
    }
    soup
}

fn main() {
    env_logger::init();

    let soup = quad_strip();
    let mut tree: BspTree<'_, Vec3> = BspTree::with_strategy(&soup, Strategy::Balanced);
    tree.reserve(soup.len());
    for (i, corner) in soup.iter().enumerate() {
        if let Err(err) = tree.insert(corner, i) {
            log::error!("corner {i} not indexed: {err}");
            return;
        }
    }
    log::info!(
        "indexed {} corners, tree height {}",
        tree.len(),
        tree.height()
    );

    let mut remap: SharedArray<'_, usize> = SharedArray::with_value(soup.len(), usize::MAX);
    let mut welded: SharedArray<'_, Vec3> = SharedArray::new();
    for (i, corner) in soup.iter().enumerate() {
        let Some(first) = tree.find(corner).next() else {
            continue;
        };
        if first == i {
            remap[i] = welded.len();
            welded.append(*corner);
        } else {
            remap[i] = remap[first];
        }
    }

    println!("{} corners -> {} vertices", soup.len(), welded.len());
    println!("indices: {:?}", remap.as_slice());
    assert_eq!(welded.len(), 6, "two quads sharing an edge have six vertices");

    let mut dump = String::new();
    if tree.dump(&mut dump).is_ok() {
        print!("{dump}");
    }
}
