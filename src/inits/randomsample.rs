use crate::{KMeans, KMeansState, Primitive, Result};
use rand::RngCore;

#[inline(always)]
pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<()> {
    let mut chosen = Vec::with_capacity(state.k);
    for ci in 0..state.k {
        // Redraw while the sample equals one of the already chosen centroids
        let sample_id = kmean.draw_distinct_sample(state, &chosen, rnd);
        state.set_centroid_from_iter(ci, kmean.sample(sample_id).iter().cloned());
        chosen.push(ci);
    }
    Ok(())
}
