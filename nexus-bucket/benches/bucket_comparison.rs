//! Benchmarks comparing nexus-bucket against the slab crate.
//!
//! Run with: cargo bench
//!
//! slab is pre-allocated; nexus-bucket grows and releases buckets as it goes,
//! so the churn groups include its allocation cost.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_bucket::BucketStorage;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const COUNT: usize = 100_000;

// ============================================================================
// Insert
// ============================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(COUNT as u64));

    for block in [16usize, 64, 256] {
        let mut storage = BucketStorage::<u64>::with_block_capacity(block);
        group.bench_with_input(BenchmarkId::new("nexus-bucket", block), &block, |b, _| {
            b.iter(|| {
                for i in 0..COUNT as u64 {
                    black_box(storage.insert(i));
                }
                storage.clear();
            });
        });
    }

    let mut slab_crate = slab::Slab::<u64>::with_capacity(COUNT);
    group.bench_function("slab", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                black_box(slab_crate.insert(i));
            }
            slab_crate.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Erase in random order
// ============================================================================

fn bench_erase_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_random");
    group.throughput(Throughput::Elements(COUNT as u64));

    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut order: Vec<usize> = (0..COUNT).collect();
    order.shuffle(&mut rng);

    group.bench_function("nexus-bucket", |b| {
        b.iter_batched(
            || {
                let mut storage = BucketStorage::<u64>::new();
                let positions: Vec<_> = (0..COUNT as u64).map(|i| storage.insert(i)).collect();
                (storage, positions)
            },
            |(mut storage, positions)| {
                for &i in &order {
                    black_box(storage.erase(positions[i]));
                }
                storage
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("slab", |b| {
        b.iter_batched(
            || {
                let mut slab = slab::Slab::<u64>::with_capacity(COUNT);
                let keys: Vec<_> = (0..COUNT as u64).map(|i| slab.insert(i)).collect();
                (slab, keys)
            },
            |(mut slab, keys)| {
                for &i in &order {
                    black_box(slab.remove(keys[i]));
                }
                slab
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// Churn around a bucket boundary
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.throughput(Throughput::Elements(COUNT as u64));

    // One element short of a full bucket: every insert lands in the same
    // bucket and every erase leaves it non-empty.
    let mut steady = BucketStorage::<u64>::with_block_capacity(64);
    steady.extend(0..62);
    group.bench_function("nexus-bucket/steady", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                let pos = steady.insert(i);
                black_box(steady.erase(pos));
            }
        });
    });

    // Empty storage: every insert allocates a bucket, every erase frees it.
    let mut boundary = BucketStorage::<u64>::with_block_capacity(64);
    group.bench_function("nexus-bucket/boundary", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                let pos = boundary.insert(i);
                black_box(boundary.erase(pos));
            }
        });
    });

    let mut slab_crate = slab::Slab::<u64>::with_capacity(64);
    group.bench_function("slab", |b| {
        b.iter(|| {
            for i in 0..COUNT as u64 {
                let key = slab_crate.insert(i);
                black_box(slab_crate.remove(key));
            }
        });
    });

    group.finish();
}

// ============================================================================
// Iterate
// ============================================================================

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");
    group.throughput(Throughput::Elements(COUNT as u64 / 2));

    // Half the elements erased, leaving holes in every bucket.
    let mut storage = BucketStorage::<u64>::new();
    let positions: Vec<_> = (0..COUNT as u64).map(|i| storage.insert(i)).collect();
    for pos in positions.into_iter().step_by(2) {
        storage.erase(pos);
    }

    let mut slab_crate = slab::Slab::<u64>::with_capacity(COUNT);
    let keys: Vec<_> = (0..COUNT as u64).map(|i| slab_crate.insert(i)).collect();
    for key in keys.into_iter().step_by(2) {
        slab_crate.remove(key);
    }

    group.bench_function("nexus-bucket", |b| {
        b.iter(|| black_box(storage.iter().sum::<u64>()));
    });

    group.bench_function("slab", |b| {
        b.iter(|| black_box(slab_crate.iter().map(|(_, v)| *v).sum::<u64>()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_erase_random,
    bench_churn,
    bench_iterate,
);
criterion_main!(benches);
