//! Benchmarks for the collection aliases used by styles and key indices

use arbor_core::alloc::{HashMap as AHashMap, IndexMap};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::collections::HashMap as StdHashMap;

fn style_keys(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("property{}", i)).collect()
}

fn bench_string_key_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_key_insert");

    for size in [8, 32, 128, 1024] {
        let keys = style_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = StdHashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(black_box(key.clone()), black_box(i));
                }
                map
            });
        });

        group.bench_with_input(BenchmarkId::new("ahash", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = AHashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(black_box(key.clone()), black_box(i));
                }
                map
            });
        });

        group.bench_with_input(BenchmarkId::new("indexmap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = IndexMap::default();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(black_box(key.clone()), black_box(i));
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_string_key_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_key_lookup");

    for size in [8, 32, 128, 1024] {
        let keys = style_keys(size);
        let std_map: StdHashMap<String, usize> =
            keys.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();
        let index_map: IndexMap<String, usize> =
            keys.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std", size), &keys, |b, keys| {
            b.iter(|| {
                let mut sum = 0;
                for key in keys {
                    sum += std_map.get(black_box(key.as_str())).copied().unwrap_or(0);
                }
                sum
            });
        });

        group.bench_with_input(BenchmarkId::new("indexmap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut sum = 0;
                for key in keys {
                    sum += index_map.get(black_box(key.as_str())).copied().unwrap_or(0);
                }
                sum
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_string_key_insert, bench_string_key_lookup);
criterion_main!(benches);
