use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evoloop::{
    rng::{RandomNumberGenerator, RandomSource},
    sampling::AliasSampler,
};

fn random_weights(size: usize, rng: &mut RandomNumberGenerator) -> Vec<f64> {
    (0..size).map(|_| rng.next_f64() + 0.01).collect()
}

fn bench_alias_build(c: &mut Criterion) {
    let mut rng = RandomNumberGenerator::from_seed(1);

    let mut group = c.benchmark_group("alias_build");
    for size in [10, 100, 1000, 10000].iter() {
        let weights = random_weights(*size, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(size), &weights, |b, weights| {
            b.iter(|| AliasSampler::new(black_box(weights)).unwrap())
        });
    }
    group.finish();
}

fn bench_alias_spin(c: &mut Criterion) {
    let mut rng = RandomNumberGenerator::from_seed(2);

    let mut group = c.benchmark_group("alias_spin");
    for size in [10, 1000, 100000].iter() {
        let sampler = AliasSampler::new(&random_weights(*size, &mut rng)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &sampler, |b, sampler| {
            b.iter(|| black_box(sampler.spin(&mut rng)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_alias_build, bench_alias_spin);
criterion_main!(benches);
