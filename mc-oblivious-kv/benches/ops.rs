// Copyright (c) 2018-2023 The MobileCoin Foundation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lut_arith::ClearBackend;
use mc_oblivious_kv::{KvStore, TableConfig};
use std::time::Duration;

fn make_store(capacity: usize) -> KvStore<ClearBackend> {
    let cfg = TableConfig::new(capacity, 4, 32, 32).expect("valid config");
    KvStore::new(ClearBackend, cfg)
}

pub fn capacity_256_insert(c: &mut Criterion) {
    let mut store = make_store(256);
    let mut key = 1u64;

    c.bench_function("capacity 256 insert", |b| {
        b.iter(|| {
            key = key.wrapping_mul(2862933555777941757).wrapping_add(1) & 0xffff_ffff;
            store.insert(black_box(key), black_box(7)).expect("in-domain insert")
        })
    });
}

pub fn capacity_256_replace(c: &mut Criterion) {
    let mut store = make_store(256);
    for k in 1..=256u64 {
        store.insert(k, k).expect("in-domain insert");
    }

    c.bench_function("capacity 256 replace", |b| {
        b.iter(|| store.replace(black_box(17), black_box(99)).expect("in-domain replace"))
    });
}

pub fn capacity_256_query(c: &mut Criterion) {
    let mut store = make_store(256);
    for k in 1..=256u64 {
        store.insert(k, k).expect("in-domain insert");
    }

    c.bench_function("capacity 256 query", |b| {
        b.iter(|| store.query(black_box(200)).expect("in-domain query"))
    });
}

criterion_group! {
    name = kv_ops;
    config = Criterion::default().measurement_time(Duration::new(10, 0));
    targets = capacity_256_insert, capacity_256_replace, capacity_256_query
}
criterion_main!(kv_ops);
