//! Benchmarks for password hashing at the supported work factors

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gatekeep_auth_core::PasswordHasher;

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("bcrypt_hash");
    group.sample_size(10);

    for cost in [4, 6, PasswordHasher::DEFAULT_COST] {
        let hasher = PasswordHasher::new(cost).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(cost), &hasher, |b, hasher| {
            b.iter(|| hasher.hash(black_box("s3cretpw")).unwrap());
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let hasher = PasswordHasher::new(PasswordHasher::DEFAULT_COST).unwrap();
    let hash = hasher.hash("s3cretpw").unwrap();

    let mut group = c.benchmark_group("bcrypt_verify");
    group.sample_size(10);

    group.bench_function("known_user", |b| {
        b.iter(|| hasher.verify(black_box("s3cretpw"), black_box(&hash)));
    });
    group.bench_function("unknown_user", |b| {
        b.iter(|| hasher.verify_dummy(black_box("s3cretpw")));
    });

    group.finish();
}

criterion_group!(benches, bench_hash, bench_verify);
criterion_main!(benches);
