// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tessera_array::{SharedArray, UnsharedArray};

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

fn gen_vertices(count: usize) -> Vec<[f32; 3]> {
    let mut rng = Rng::new(0x5EED_0F_7E55_E7A5);
    (0..count)
        .map(|_| [rng.next_f32(), rng.next_f32(), rng.next_f32()])
        .collect()
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    for &n in &[8usize, 64, 4096, 65_536] {
        let vertices = gen_vertices(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("shared_n{}", n), |b| {
            b.iter(|| {
                let mut a: SharedArray<'_, [f32; 3]> = SharedArray::new();
                for v in &vertices {
                    a.append(*v);
                }
                black_box(a.len())
            });
        });
        group.bench_function(format!("unshared_n{}", n), |b| {
            b.iter(|| {
                let mut a: UnsharedArray<[f32; 3]> = UnsharedArray::new();
                for v in &vertices {
                    a.append(*v);
                }
                black_box(a.len())
            });
        });
        group.bench_function(format!("vec_n{}", n), |b| {
            b.iter(|| {
                let mut a: Vec<[f32; 3]> = Vec::new();
                for v in &vertices {
                    a.push(*v);
                }
                black_box(a.len())
            });
        });
    }
    group.finish();
}

fn bench_copy_on_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_on_write");
    for &n in &[64usize, 4096, 65_536] {
        let base: SharedArray<'_, [f32; 3]> = gen_vertices(n).into();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("clone_only_n{}", n), |b| {
            b.iter(|| black_box(base.clone()).len());
        });
        group.bench_function(format!("clone_then_write_n{}", n), |b| {
            b.iter_batched(
                || base.clone(),
                |mut copy| {
                    copy[0] = [1.0, 1.0, 1.0];
                    black_box(copy.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_raw_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_data");
    let vertices = gen_vertices(4096);
    group.throughput(Throughput::Elements(vertices.len() as u64));
    group.bench_function("wrap_and_sum", |b| {
        b.iter(|| {
            let a = SharedArray::<[f32; 3]>::from_raw_data(&vertices);
            let sum: f32 = a.iter().map(|v| v[0] + v[1] + v[2]).sum();
            black_box(sum)
        });
    });
    group.bench_function("copy_and_sum", |b| {
        b.iter(|| {
            let a: SharedArray<'_, [f32; 3]> = SharedArray::from(vertices.as_slice());
            let sum: f32 = a.iter().map(|v| v[0] + v[1] + v[2]).sum();
            black_box(sum)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_append, bench_copy_on_write, bench_raw_data);
criterion_main!(benches);
