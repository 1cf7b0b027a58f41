use criterion::{criterion_group, criterion_main, Criterion};
use kcluster::{ConvergenceRule, KMeans, KMeansConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_samples(sample_cnt: usize, sample_dims: usize) -> KMeans<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(1337);
    let samples = (0..sample_cnt * sample_dims).map(|_| rng.gen_range(0.0..1.0)).collect();
    KMeans::new(samples, sample_cnt, sample_dims).expect("valid bench samples")
}

fn bench_kmeans(c: &mut Criterion) {
    let kmean = random_samples(10_000, 8);

    c.bench_function("lloyd_random_10k_8d_k10", |b| {
        b.iter(|| {
            let config = KMeansConfig::build()
                .random_generator(ChaCha8Rng::seed_from_u64(42))
                .build();
            kmean.kmeans_lloyd(10, KMeans::init_random_sample, &config).expect("random bench run")
        });
    });

    c.bench_function("lloyd_kmeanplusplus_10k_8d_k10", |b| {
        b.iter(|| {
            let config = KMeansConfig::build()
                .random_generator(ChaCha8Rng::seed_from_u64(42))
                .build();
            kmean.kmeans_lloyd(10, KMeans::init_kmeanplusplus, &config).expect("kmeans++ bench run")
        });
    });

    let small = random_samples(2_000, 4);
    c.bench_function("restarts_fixed_point_2k_4d_k8_x10", |b| {
        b.iter(|| {
            let config = KMeansConfig::build()
                .random_generator(ChaCha8Rng::seed_from_u64(42))
                .convergence_rule(ConvergenceRule::FixedPoint)
                .restarts(10)
                .build();
            small.kmeans_lloyd(8, KMeans::init_random_sample, &config).expect("restarts bench run")
        });
    });
}

criterion_group!(benches, bench_kmeans);
criterion_main!(benches);
