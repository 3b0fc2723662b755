// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use pcollections::list::List;

fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_push_back");
    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut l = List::new();
                for i in 0..size {
                    l = l.push_back(i);
                }
                l
            });
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let l: List<usize> = (0..10_000).collect();
    c.bench_function("list_get_middle", |b| {
        b.iter(|| l.get(5_000).unwrap());
    });
}

fn bench_builder_vs_immutable(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_bulk_insert");
    group.bench_function("immutable_path_copy", |b| {
        b.iter(|| {
            let mut l = List::new();
            for i in 0..1_000 {
                l = l.push_back(i);
            }
            l
        });
    });
    group.bench_function("builder_in_place", |b| {
        b.iter(|| {
            let mut builder = List::<i32>::new().to_builder();
            for i in 0..1_000 {
                builder.push_back(i);
            }
            builder.to_immutable()
        });
    });
    group.finish();
}

fn bench_sort_sub_range(c: &mut Criterion) {
    let l: List<i32> = (0..10_000).rev().collect();
    c.bench_function("list_sort_sub_range", |b| {
        b.iter(|| l.sort(1_000, 9_000, |a, b| a.cmp(b)).unwrap());
    });
}

criterion_group!(benches, bench_push_back, bench_get, bench_builder_vs_immutable, bench_sort_sub_range);
criterion_main!(benches);
