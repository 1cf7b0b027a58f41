use crate::{KMeans, KMeansConfig, KMeansState, Primitive, Result};
use rand::RngCore;

pub(crate) struct Lloyd<T: Primitive> {
    _p: std::marker::PhantomData<T>
}
impl<T: Primitive> Lloyd<T> {
    /// Move every centroid to the mean of its members and repair empty clusters.
    /// ## Returns
    /// The new distance sum and the amount of repaired (empty) clusters.
    pub(crate) fn update_centroids(data: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> (T, usize) {
        let dims = data.sample_dims;
        let used_centroids_cnt = data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);

        // Running mean of all samples in a cluster. Exact when all members are equal.
        let mut new_centroids = vec![T::zero(); state.centroids.len()];
        let mut member_cnt = vec![T::zero(); state.k];
        data.samples.chunks_exact(dims)
            .zip(state.assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                member_cnt[centroid_id] += T::one();
                let cnt = member_cnt[centroid_id];
                new_centroids.iter_mut().skip(centroid_id * dims).take(dims)
                    .zip(s.iter().cloned())
                    .for_each(|(cv, sv)| *cv += (sv - *cv) / cnt);
            });

        // Empty clusters keep their old value until repaired below, so no NaN ever reaches the centroid table.
        state.centroids.chunks_exact_mut(dims)
            .zip(new_centroids.chunks_exact(dims))
            .zip(member_cnt.iter().cloned())
            .filter(|(_, cnt)| *cnt > T::zero())
            .for_each(|((c, nc), _)| c.copy_from_slice(nc));

        // Use used_centroids_cnt variable to check, whether there are empty clusters
        // When there are, move them onto random samples that no other centroid occupies
        let mut repaired = 0;
        if used_centroids_cnt != state.k {
            let mut occupied: Vec<usize> = (0..state.k).filter(|&i| state.centroid_frequency[i] > 0).collect();
            for i in 0..state.k {
                if state.centroid_frequency[i] == 0 {
                    let sample_id = data.draw_distinct_sample(state, &occupied, rnd);
                    state.set_centroid_from_iter(i, data.sample(sample_id).iter().cloned());
                    occupied.push(i);
                    repaired += 1;
                    tracing::debug!(cluster = i, sample = sample_id, "repaired empty cluster");
                }
            }
        }

        data.update_centroid_distances(state);
        (state.centroid_distances.iter().cloned().sum(), repaired)
    }

    /// One complete run: initialize, then iterate until converged or `max_iterations` is reached.
    pub fn calculate<F>(data: &KMeans<T>, k: usize, init: &F, config: &KMeansConfig<'_, T>, rnd: &mut dyn RngCore) -> Result<KMeansState<T>>
                where F: Fn(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<()> {
        let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
        state.distsum = T::infinity();

        // Initialize clusters and notify subscriber
        init(data, &mut state, &mut *rnd)?;
        (config.init_done)(&state);
        let mut convergence = config.convergence_rule.create_logic(&state.centroids);

        for i in 1..=config.max_iterations {
            data.update_cluster_assignments(&mut state, None);
            let (new_distsum, repaired) = Self::update_centroids(data, &mut state, rnd);
            state.iterations = i;

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, i, new_distsum);
            let keep_going = convergence.next(&state.centroids, new_distsum);
            state.distsum = new_distsum;

            // A freshly repaired centroid has no members yet, so that pass can not be final
            if !keep_going && (repaired == 0 || new_distsum == T::zero()) {
                state.converged = true;
                break;
            }
        }

        if state.converged {
            tracing::trace!(iterations = state.iterations, distsum = %state.distsum, "run converged");
        } else {
            tracing::debug!(max_iterations = config.max_iterations, distsum = %state.distsum,
                "run stopped without converging");
        }
        Ok(state)
    }
}
