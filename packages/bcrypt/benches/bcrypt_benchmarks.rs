//! Benchmarks for bcrypt hashing across cost factors and drivers

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cryypt_bcrypt::{Bcrypt, Salt};
use tokio::runtime::Runtime;

/// Blocking hash at increasing cost
fn benchmark_cost_factors(c: &mut Criterion) {
    let mut group = c.benchmark_group("bcrypt_cost");
    let salt = Salt::new([0x5a; 16]);

    for cost in 4u32..=8 {
        let bcrypt = Bcrypt::new().with_cost(cost);
        group.bench_with_input(BenchmarkId::new("blocking", cost), &bcrypt, |b, bcrypt| {
            b.iter(|| {
                let hash = bcrypt
                    .hash_with_salt("correct horse battery staple", salt.clone())
                    .expect("bcrypt hash should succeed");
                std::hint::black_box(hash);
            });
        });
    }
    group.finish();
}

/// Overhead of cooperative slicing against the blocking path
fn benchmark_cooperative_driver(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("bcrypt_driver");
    let salt = Salt::new([0x5a; 16]);

    for cost in [6u32, 8] {
        let bcrypt = Bcrypt::new().with_cost(cost);
        group.bench_with_input(BenchmarkId::new("cooperative", cost), &bcrypt, |b, bcrypt| {
            b.iter(|| {
                rt.block_on(async {
                    let hash = bcrypt
                        .compute_with_salt("correct horse battery staple", salt.clone())
                        .await
                        .expect("bcrypt hash should succeed");
                    std::hint::black_box(hash);
                });
            });
        });
        group.bench_with_input(BenchmarkId::new("blocking", cost), &bcrypt, |b, bcrypt| {
            b.iter(|| {
                let hash = bcrypt
                    .hash_with_salt("correct horse battery staple", salt.clone())
                    .expect("bcrypt hash should succeed");
                std::hint::black_box(hash);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_cost_factors,
    benchmark_cooperative_driver
);
criterion_main!(benches);
