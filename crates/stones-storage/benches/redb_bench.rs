//! Benchmarks for the Redb storage backend.

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use stones_storage::backends::RedbEngine;
use stones_storage::{Cursor, Namespace, StorageEngine, Transaction};

fn engine_with_namespace() -> (RedbEngine, Namespace) {
    let engine = RedbEngine::in_memory().unwrap();
    let ns = engine.open_namespace(Some("bench")).unwrap();
    (engine, ns)
}

/// Benchmark batch writes in one transaction.
fn bench_put_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_put_batch");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("put_batch_{size}"), |b| {
            b.iter_batched(
                engine_with_namespace,
                |(engine, ns)| {
                    let mut tx = engine.begin_write().unwrap();
                    for i in 0..size {
                        let key = format!("key:{i:05}");
                        let value = format!("value:{i:05}");
                        tx.put(&ns, key.as_bytes(), value.as_bytes(), false).unwrap();
                    }
                    tx.commit().unwrap();
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark single key reads.
fn bench_get_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_get_single");
    group.throughput(Throughput::Elements(1));

    let (engine, ns) = engine_with_namespace();
    {
        let mut tx = engine.begin_write().unwrap();
        tx.put(&ns, b"key", b"value", true).unwrap();
        tx.commit().unwrap();
    }

    group.bench_function("get_single", |b| {
        b.iter(|| {
            let tx = engine.begin_read().unwrap();
            black_box(tx.get(&ns, b"key").unwrap());
        });
    });

    group.finish();
}

/// Benchmark a full cursor scan.
fn bench_cursor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_cursor_scan");
    const NUM_KEYS: u64 = 5000;
    group.throughput(Throughput::Elements(NUM_KEYS));

    let (engine, ns) = engine_with_namespace();
    {
        let mut tx = engine.begin_write().unwrap();
        for i in 0..NUM_KEYS {
            tx.put(&ns, &i.to_be_bytes(), b"value", true).unwrap();
        }
        tx.commit().unwrap();
    }

    group.bench_function("scan_all", |b| {
        b.iter(|| {
            let tx = engine.begin_read().unwrap();
            let mut cursor = tx.cursor(&ns).unwrap();
            let mut count = 0u64;
            while cursor.next().unwrap().is_some() {
                count += 1;
            }
            black_box(count);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_put_batch, bench_get_single, bench_cursor_scan);
criterion_main!(benches);
