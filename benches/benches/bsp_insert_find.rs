// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_bsp::{BspTree, Strategy};

fn gen_grid_points(n: usize, cell: f32) -> Vec<[f32; 3]> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                out.push([x as f32 * cell, y as f32 * cell, z as f32 * cell]);
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

fn gen_random_points(count: usize, extent: f32) -> Vec<[f32; 3]> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            [
                rng.next_f32() * extent,
                rng.next_f32() * extent,
                rng.next_f32() * extent,
            ]
        })
        .collect()
}

// Every point appears twice, as in an unwelded triangle soup.
fn gen_soup(count: usize) -> Vec<[f32; 3]> {
    let unique = gen_random_points(count / 2, 100.0);
    let mut out = Vec::with_capacity(count);
    for (i, p) in unique.iter().enumerate() {
        out.push(*p);
        out.push(unique[(i * 7) % unique.len()]);
    }
    out
}

fn build<'k>(points: &'k [[f32; 3]], strategy: Strategy) -> BspTree<'k, [f32; 3]> {
    let mut tree = BspTree::with_strategy(points, strategy);
    tree.reserve(points.len());
    for (i, p) in points.iter().enumerate() {
        let _ = tree.insert(p, i);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsp_insert");
    for &n in &[8usize, 16, 32] {
        let points = gen_grid_points(n, 1.0);
        group.throughput(Throughput::Elements(points.len() as u64));
        for strategy in [Strategy::Balanced, Strategy::AdHoc] {
            group.bench_function(format!("grid_n{}_{:?}", n, strategy), |b| {
                b.iter(|| black_box(build(&points, strategy).height()));
            });
        }
    }
    let points = gen_random_points(50_000, 1000.0);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("random_50k", |b| {
        b.iter(|| black_box(build(&points, Strategy::Balanced).height()));
    });
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsp_find");
    let points = gen_soup(60_000);
    let tree = build(&points, Strategy::Balanced);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("weld_soup_60k", |b| {
        b.iter(|| {
            let mut welded = 0usize;
            for p in &points {
                if let Some(first) = tree.find(p).next() {
                    welded += first;
                }
            }
            black_box(welded)
        });
    });
    group.bench_function("clone_then_insert", |b| {
        let extra = [5000.0_f32, 5000.0, 5000.0];
        let mut keys = points.clone();
        keys.push(extra);
        let mut base = BspTree::new(&keys);
        for (i, p) in points.iter().enumerate() {
            let _ = base.insert(p, i);
        }
        b.iter_batched(
            || base.clone(),
            |mut tree: BspTree<'_, [f32; 3]>| {
                let _ = tree.insert(&extra, points.len());
                black_box(tree.height())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_find);
criterion_main!(benches);
