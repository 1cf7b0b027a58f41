use crate::{KMeans, KMeansError, KMeansState, Primitive, Result};

#[inline(always)]
pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, computed: &[T]) -> Result<()> {
    if computed.len() != state.k * kmean.sample_dims {
        return Err(KMeansError::InvalidConfig(format!(
            "expected {} precomputed centroids with {} dimensions ({} values), got {} values",
            state.k, kmean.sample_dims, state.k * kmean.sample_dims, computed.len())));
    }
    if computed.iter().any(|v| !v.is_finite()) {
        return Err(KMeansError::InvalidConfig("precomputed centroids must be finite".into()));
    }
    computed.chunks_exact(kmean.sample_dims).enumerate().for_each(|(ci, c)| {
        state.set_centroid_from_iter(ci, c.iter().cloned());
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KMeansConfig;

    #[test]
    fn train_with_precomputed_centroids() {
        let samples = vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0];
        let centroids = vec![5.0, 20.0];
        let sample_cnt = samples.len();

        let kmean: KMeans<f32> = KMeans::new(samples, sample_cnt, 1).unwrap();
        let result = kmean.kmeans_lloyd(2, KMeans::init_precomputed(centroids), &KMeansConfig::default()).unwrap();

        assert_eq!(result.centroids, vec![5.5, 20.5]);
    }

    #[test]
    fn wrong_amount_of_centroids_is_rejected() {
        let kmean: KMeans<f64> = KMeans::new(vec![0.0, 1.0, 2.0], 3, 1).unwrap();
        let res = kmean.kmeans_lloyd(2, KMeans::init_precomputed(vec![0.0]), &KMeansConfig::default());
        assert!(matches!(res, Err(KMeansError::InvalidConfig(_))));
    }
}
