use crate::{KMeans, KMeansState, Primitive, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

#[inline(always)]
pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<()> {
    {
        // Randomly select first centroid
        let first_idx = rnd.gen_range(0..kmean.sample_cnt);
        state.set_centroid_from_iter(0, kmean.sample(first_idx).iter().cloned());
    }
    let mut chosen = vec![0];
    for k in 1..state.k {
        // For each following centroid...
        // Calculate distances & update cluster-assignments
        kmean.update_cluster_assignments(state, Some(k));

        // Use rand's WeightedIndex to randomly draw a centroid, while respecting their (squared) distances.
        // Samples that coincide with a centroid have weight 0. When all of them do, the weights are
        // invalid and a distinct (or, failing that, duplicate) sample is drawn uniformly instead.
        let sampled_centroid_id = match WeightedIndex::new(&state.centroid_distances) {
            Ok(centroid_index) => centroid_index.sample(rnd),
            Err(_) => kmean.draw_distinct_sample(state, &chosen, rnd)
        };
        state.set_centroid_from_iter(k, kmean.sample(sampled_centroid_id).iter().cloned());
        chosen.push(k);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_distant_samples_as_centroids() {
        // Three tight groups, far apart from each other
        let samples = vec![0.0f64, 0.0, 0.1, 0.0, 100.0, 100.0, 100.1, 100.0, -100.0, 50.0, -100.1, 50.0];
        let kmean = KMeans::new(samples, 6, 2).unwrap();

        for seed in 0..10 {
            let mut rnd = StdRng::seed_from_u64(seed);
            let mut state = KMeansState::new(6, 2, 3);
            calculate(&kmean, &mut state, &mut rnd).unwrap();

            let mut groups: Vec<i64> = (0..3).map(|ci| (state.centroid(ci)[0] / 100.0).round() as i64).collect();
            groups.sort();
            assert_eq!(groups, vec![-1, 0, 1]);
        }
    }

    #[test]
    fn identical_samples_do_not_panic() {
        let kmean = KMeans::new(vec![3.0f64; 10], 5, 2).unwrap();
        let mut state = KMeansState::new(5, 2, 3);
        calculate(&kmean, &mut state, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(state.centroids, vec![3.0; 6]);
    }
}
