use crate::variants::Lloyd;
use crate::{KMeans, KMeansConfig, KMeansState, Primitive, Result};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Runs [`Lloyd`] `config.restarts` times and keeps the run with the lowest distortion.
pub(crate) struct Restarts<T: Primitive> {
    _p: std::marker::PhantomData<T>
}
impl<T: Primitive> Restarts<T> {
    pub fn calculate<F>(data: &KMeans<T>, k: usize, init: &F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>>
                where F: Fn(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<()> {
        tracing::debug!(k, restarts = config.restarts, max_iterations = config.max_iterations,
            samples = data.sample_cnt, dims = data.sample_dims, "starting kmeans");

        let mut best: Option<KMeansState<T>> = None;
        for restart in 1..=config.restarts {
            // Every restart owns a generator seeded from the configured one
            let seed = config.rnd.borrow_mut().next_u64();
            let mut restart_rnd = ChaCha8Rng::seed_from_u64(seed);
            let state = Lloyd::calculate(data, k, init, config, &mut restart_rnd)?;
            (config.restart_done)(&state, restart);

            if best.as_ref().map_or(true, |b| state.distsum < b.distsum) {
                tracing::debug!(restart, seed, distsum = %state.distsum, iterations = state.iterations,
                    converged = state.converged, "accepting new best kmeans solution");
                best = Some(state);
            }
        }
        // restarts >= 1 is validated by the caller, so at least one run happened
        best.ok_or_else(|| crate::KMeansError::InvalidConfig("restarts must be > 0".into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::helpers::testing::*;
    use crate::*;
    use rand::prelude::*;
    use std::cell::RefCell;

    fn three_blobs(seed: u64) -> KMeans<f64> {
        let mut rnd = StdRng::seed_from_u64(seed);
        let centers = [(0.0, 0.0), (8.0, 0.0), (4.0, 8.0)];
        let mut samples = Vec::new();
        for i in 0..150 {
            let (cx, cy) = centers[i % 3];
            samples.push(cx + rnd.gen_range(-1.5..1.5));
            samples.push(cy + rnd.gen_range(-1.5..1.5));
        }
        KMeans::new(samples, 150, 2).unwrap()
    }

    #[test]
    fn returns_best_of_all_restarts() {
        let kmean = three_blobs(3);
        let distsums = RefCell::new(Vec::new());
        let record = |s: &KMeansState<f64>, restart: usize| distsums.borrow_mut().push((restart, s.distsum));
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(17))
            .restarts(12)
            .restart_done(&record)
            .build();

        let res = kmean.kmeans_lloyd(5, KMeans::init_random_sample, &conf).unwrap();
        let distsums = distsums.borrow();
        assert_eq!(distsums.iter().map(|(r, _)| *r).collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());
        let min = distsums.iter().map(|(_, d)| *d).fold(f64::INFINITY, f64::min);
        assert_eq!(res.distsum, min);
        assert_partition(&kmean, &res);
        assert_centroids_are_means(&kmean, &res, 1e-9);
    }

    #[test]
    fn finds_the_three_blobs() {
        let kmean = three_blobs(8);
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(1))
            .restarts(10)
            .build();
        let res = kmean.kmeans_lloyd(3, KMeans::init_random_sample, &conf).unwrap();

        assert_eq!(res.centroid_frequency, vec![50, 50, 50]);
        for (sample_id, &cluster_id) in res.assignments.iter().enumerate() {
            assert_eq!(cluster_id, res.assignments[sample_id % 3]);
        }
        let mut centers: Vec<(i64, i64)> = (0..3)
            .map(|ci| (res.centroid(ci)[0].round() as i64, res.centroid(ci)[1].round() as i64))
            .collect();
        centers.sort();
        for ((x, y), (sx, sy)) in centers.iter().zip([(0i64, 0i64), (4, 8), (8, 0)]) {
            assert!((x - sx).abs() <= 1 && (y - sy).abs() <= 1, "unexpected centers {:?}", centers);
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let kmean = three_blobs(5);
        let calc = |init_seed: u64| {
            let conf = KMeansConfig::build()
                .random_generator(StdRng::seed_from_u64(init_seed))
                .restarts(4)
                .build();
            kmean.kmeans_lloyd(4, KMeans::init_kmeanplusplus, &conf).unwrap()
        };
        let (a, b) = (calc(23), calc(23));
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.distsum, b.distsum);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn works_on_f32() {
        let samples = vec![0.1f32, 0.55, 12.2, 1.55, 2.3, 4.0, 1.8, 0.33, 0.2, 0.56, 12.3, 1.56, 3.1, 3.9, 1.6, 0.5];
        let kmean = KMeans::new(samples, 4, 4).unwrap();
        let conf = KMeansConfig::build()
            .random_generator(StdRng::seed_from_u64(2))
            .restarts(5)
            .build();
        let res = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf).unwrap();
        assert_eq!(res.assignments[0], res.assignments[2]);
        assert_eq!(res.assignments[1], res.assignments[3]);
        assert_approx_eq!(res.distsum, 0.36955f32, 1e-4);
    }
}
