use crate::Primitive;

/// Squared euclidean distance between two equally long vectors.
#[inline(always)]
pub(crate) fn squared_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter().cloned()
        .zip(b.iter().cloned())
        .map(|(av, bv)| av - bv)        // <a> - <b>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum()                          // sum(<vec_components>^2)
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-9))
}

#[cfg(test)]
pub(crate) mod testing {
	use crate::{KMeans, KMeansState, Primitive};

	/// Every sample sits in exactly one cluster, and the membership view agrees with `assignments`.
	pub fn assert_partition<T: Primitive>(kmean: &KMeans<T>, state: &KMeansState<T>) {
		let clusters = state.clusters();
		assert_eq!(clusters.len(), state.k);
		assert_eq!(state.assignments.len(), kmean.sample_cnt());

		let mut seen = vec![0usize; kmean.sample_cnt()];
		for (cluster_id, members) in clusters.iter().enumerate() {
			assert_eq!(members.len(), state.centroid_frequency[cluster_id]);
			for &sample_id in members {
				assert_eq!(state.assignments[sample_id], cluster_id);
				seen[sample_id] += 1;
			}
		}
		assert!(seen.iter().all(|&cnt| cnt == 1), "Sample contained in none or several clusters: {:?}", seen);
		assert_eq!(clusters.iter().map(|c| c.len()).sum::<usize>(), kmean.sample_cnt());
	}

	/// Every non-empty cluster's centroid is the coordinate-wise mean of its members, and nothing is NaN.
	pub fn assert_centroids_are_means<T: Primitive>(kmean: &KMeans<T>, state: &KMeansState<T>, tol: T) {
		assert!(state.centroids.iter().all(|v| !v.is_nan()), "NaN centroid component: {:?}", state.centroids);
		for (cluster_id, members) in kmean.cluster_members(state).iter().enumerate() {
			if members.is_empty() {
				continue;
			}
			let cnt = T::from(members.len()).unwrap();
			for d in 0..kmean.sample_dims() {
				let mean = members.iter().map(|m| m[d]).sum::<T>() / cnt;
				assert_approx_eq!(state.centroid(cluster_id)[d], mean, tol);
			}
		}
	}
}
