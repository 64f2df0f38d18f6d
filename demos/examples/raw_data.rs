// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared array storage modes.
//!
//! Wrap borrowed memory read-only and writable, then watch copies share and detach.
//!
//! Run:
//! - `cargo run -p tessera_demos --example raw_data`

use tessera_array::{SharedArray, StorageKind, UnsharedArray};

fn main() {
    env_logger::init();

    // Read-only wrapping: the first write copies.
    let samples = [1.0_f32, 2.0, 3.0, 4.0];
    let mut view = SharedArray::<f32>::from_raw_data(&samples);
    println!("wrapped: {:?} ({:?})", view.as_slice(), view.storage_kind());
    view[0] = 10.0;
    println!("after write: {:?} ({:?})", view.as_slice(), view.storage_kind());
    println!("source untouched: {samples:?}");

    // Writable wrapping: writes land in the caller's buffer until it must grow.
    let mut buffer = [0_u32; 4];
    {
        let mut array = SharedArray::<u32>::from_writable_raw_data(&mut buffer);
        array.fill(7);
        array.remove_last();
        array.append(9);
        assert_eq!(array.storage_kind(), StorageKind::BorrowedMut);
        array.append(11);
        println!("grown: {:?} ({:?})", array.as_slice(), array.storage_kind());
    }
    println!("buffer: {buffer:?}");

    // Implicit sharing: clones share one heap block until one of them writes.
    let original: SharedArray<'_, u32> = (0..100).collect();
    let mut copy = original.clone();
    println!(
        "before write: {:?} / {:?}",
        original.storage_kind(),
        copy.storage_kind()
    );
    copy.append(100);
    println!(
        "after write: {:?} / {:?}, lengths {} and {}",
        original.storage_kind(),
        copy.storage_kind(),
        original.len(),
        copy.len()
    );

    // Slices borrow the array; unshared arrays never share.
    let middle = original.mid(10, 5);
    println!("mid(10, 5): {:?}", middle.as_slice());
    let mut scratch = UnsharedArray::<u32>::from_slice(&middle);
    scratch.append(0);
    println!("scratch: {:?}", scratch.as_slice());
}
