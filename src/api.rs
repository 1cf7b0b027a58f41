use crate::{helpers, ConvergenceRule, KMeansError, Primitive, Result};
use rand::prelude::*;
use std::cell::RefCell;

/// Identifier of a cluster, dense in `[0, k)`.
pub type ClusterId = usize;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);
pub type RestartDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize);

/// Amount of random draws tried before the sample selection falls back to a linear scan.
const MAX_RANDOM_DRAWS: usize = 32;

/// This is a structure holding the configuration options for a k-means calculation, such as
/// the random number generator to use, the convergence rule, iteration and restart limits, or a
/// couple of callbacks that can be set to get status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase of a run finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: New distance sum (**state** contains the distsum from the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Callback that is called after each completed restart
    /// ## Arguments
    /// - **state**: Final [`KMeansState`] of the restart
    /// - **restart_id**: Number of the restart
    pub(crate) restart_done: RestartDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The convergence rule to use for each run
    pub(crate) convergence_rule: ConvergenceRule<T>,
    /// Hard limit of iterations per run
    pub(crate) max_iterations: usize,
    /// Amount of independent runs, of which the one with the lowest distortion is kept
    pub(crate) restarts: usize,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_, _, _| {},
            restart_done: &|_, _| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            convergence_rule: ConvergenceRule::ErrorThreshold {
                d: T::from(0.0005).unwrap_or_else(T::epsilon)
            },
            max_iterations: 100,
            restarts: 1,
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub fn convergence_rule(&self) -> ConvergenceRule<T> { self.convergence_rule }
    pub fn max_iterations(&self) -> usize { self.max_iterations }
    pub fn restarts(&self) -> usize { self.restarts }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(KMeansError::InvalidConfig("max_iterations must be > 0".into()));
        }
        if self.restarts == 0 {
            return Err(KMeansError::InvalidConfig("restarts must be > 0".into()));
        }
        self.convergence_rule.validate().map_err(KMeansError::InvalidConfig)
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("convergence_rule", &self.convergence_rule)
            .field("max_iterations", &self.max_iterations)
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the callback that should be called after each finished restart.
    pub fn restart_done(mut self, restart_done: RestartDoneCallbackFn<'a, T>) -> Self {
        self.config.restart_done = restart_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the convergence rule to use during a running k-means calculation. For more information,
    /// see documentation of [`ConvergenceRule`].
    /// ## Default
    /// [`ConvergenceRule::ErrorThreshold`] `{ d: 0.0005 }`
    pub fn convergence_rule(mut self, convergence_rule: ConvergenceRule<T>) -> Self {
        self.config.convergence_rule = convergence_rule; self
    }
    /// Limit the maximum amount of iterations per run. A run that hits this limit returns its current
    /// state, marked as not converged.
    /// ## Default
    /// 100
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations; self
    }
    /// Set the amount of independent runs (each with a fresh random initialization).
    /// The run with the lowest final distortion is returned.
    /// ## Default
    /// 1
    pub fn restarts(mut self, restarts: usize) -> Self {
        self.config.restarts = restarts; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable. Every run works on
/// a fresh instance.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of squared distances from all samples to their respective centroids
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's squared distance to its centroid
/// - **iterations**: Amount of iterations the run took
/// - **converged**: Whether the convergence rule stopped the run (**false** if `max_iterations` was hit)
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<ClusterId>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,
    pub converged: bool,

    pub(crate) sample_dims: usize
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: vec![T::zero(); sample_dims * k],
            centroid_frequency: vec![0usize; k],
            assignments: vec![0usize; sample_cnt],
            centroid_distances: vec![T::infinity(); sample_cnt],
            iterations: 0,
            converged: false,
            sample_dims
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: ClusterId, src: impl Iterator<Item = T>) {
        self.centroids.iter_mut().skip(self.sample_dims * idx).take(self.sample_dims)
                .zip(src)
                .for_each(|(c, s)| *c = s);
    }

    /// The centroid of cluster **idx**.
    pub fn centroid(&self, idx: ClusterId) -> &[T] {
        &self.centroids[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }

    /// Sample indices contained in each cluster, ordered by cluster id.
    /// Each sample index appears in exactly one list, in ascending order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.k];
        self.assignments.iter().cloned().enumerate()
            .for_each(|(sample_id, cluster_id)| clusters[cluster_id].push(sample_id));
        clusters
    }

    /// Whether **candidate** equals (by value) one of the centroids in **others**.
    pub(crate) fn centroid_collides(&self, candidate: &[T], others: &[ClusterId]) -> bool {
        others.iter().any(|&other| self.centroid(other) == candidate)
    }
}




/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on. The primitive type
/// of the passed samples array will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure. The samples are never mutated; a calculation only
/// partitions them.
///
/// ## Supported initialization methods
/// - Random-Sample [`KMeans::init_random_sample`]
/// - K-Mean++ [`KMeans::init_kmeanplusplus`]
/// - Precomputed [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    ///
    /// Samples must be finite and small enough that `sample_cnt * sample_dims * (2 * max|v|)^2` is
    /// representable in **T** (roughly `|v| < 1e150` for [`f64`], `|v| < 1e17` for [`f32`]).
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 || sample_dims == 0 {
            return Err(KMeansError::InvalidData(format!(
                "need at least one sample with at least one dimension, got {} samples with {} dimensions",
                sample_cnt, sample_dims)));
        }
        let value_cnt = sample_cnt.checked_mul(sample_dims).ok_or_else(|| KMeansError::InvalidData(format!(
            "{} samples with {} dimensions exceed the addressable size", sample_cnt, sample_dims)))?;
        if samples.len() != value_cnt {
            return Err(KMeansError::InvalidData(format!(
                "{} values can not hold {} samples with {} dimensions", samples.len(), sample_cnt, sample_dims)));
        }
        if let Some(pos) = samples.iter().position(|v| !v.is_finite()) {
            return Err(KMeansError::InvalidData(format!(
                "sample {} contains the non-finite value {}", pos / sample_dims, samples[pos])));
        }
        // Every distance sum stays below value_cnt * (2 * max_abs)^2, which has to be representable
        let max_abs = samples.iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
        let distsum_bound = T::from(value_cnt).unwrap_or_else(T::infinity) * (max_abs + max_abs).powi(2);
        if !distsum_bound.is_finite() {
            return Err(KMeansError::InvalidData(format!(
                "sample magnitude {} is too large, squared distances would overflow", max_abs)));
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Create a new instance of the [`KMeans`] structure from a list of equally long vectors.
    pub fn from_vectors(vectors: &[Vec<T>]) -> Result<Self> {
        let sample_dims = vectors.first().map(|v| v.len()).unwrap_or(0);
        if let Some(idx) = vectors.iter().position(|v| v.len() != sample_dims) {
            return Err(KMeansError::InvalidData(format!(
                "sample {} has {} dimensions, expected {}", idx, vectors[idx].len(), sample_dims)));
        }
        Self::new(vectors.concat(), vectors.len(), sample_dims)
    }

    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    pub fn sample_dims(&self) -> usize { self.sample_dims }

    /// The sample at position **idx** of the input.
    pub fn sample(&self, idx: usize) -> &[T] {
        &self.samples[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }

    /// Member samples of each cluster in **state**, ordered by cluster id.
    pub fn cluster_members<'s>(&'s self, state: &KMeansState<T>) -> Vec<Vec<&'s [T]>> {
        state.clusters().into_iter()
            .map(|members| members.into_iter().map(|sample_id| self.sample(sample_id)).collect())
            .collect()
    }


    pub(crate) fn update_centroid_distances(&self, state: &mut KMeansState<T>) {
        let centroids = &state.centroids;
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter().cloned())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let centroid = &centroids[assignment * self.sample_dims..(assignment + 1) * self.sample_dims];
                *centroid_dist = helpers::squared_distance(s, centroid);
            });
    }

    /// Assign every sample to its nearest centroid. On equal distances the lowest cluster id wins.
    /// With **limit_k**, only the first **limit_k** centroids are considered.
    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>, limit_k: Option<usize>) {
        let centroids = &state.centroids;
        let k = limit_k.unwrap_or(state.k);

        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter_mut())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let mut best_idx = 0;
                let mut best_dist = T::infinity();
                centroids.chunks_exact(self.sample_dims).take(k)
                    .map(|c| helpers::squared_distance(s, c))
                    .enumerate()
                    .for_each(|(idx, dist)| if dist < best_dist {
                        best_idx = idx;
                        best_dist = dist;
                    });
                *assignment = best_idx;
                *centroid_dist = best_dist;
            });
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[ClusterId], centroid_frequency: &mut [usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Randomly select a sample whose value differs from the centroids listed in **avoid**.
    /// After [`MAX_RANDOM_DRAWS`] unsuccessful draws, the samples are scanned starting at a random
    /// position. If every sample collides, a random (duplicate) sample is accepted.
    pub(crate) fn draw_distinct_sample(&self, state: &KMeansState<T>, avoid: &[ClusterId], rnd: &mut dyn RngCore) -> usize {
        for _ in 0..MAX_RANDOM_DRAWS {
            let sample_id = rnd.gen_range(0..self.sample_cnt);
            if !state.centroid_collides(self.sample(sample_id), avoid) {
                return sample_id;
            }
        }
        let offset = rnd.gen_range(0..self.sample_cnt);
        (0..self.sample_cnt)
            .map(|i| (offset + i) % self.sample_cnt)
            .find(|&sample_id| !state.centroid_collides(self.sample(sample_id), avoid))
            .unwrap_or_else(|| {
                tracing::trace!(avoided = avoid.len(), "no distinct sample left, accepting duplicate");
                offset
            })
    }



    /// K-Means algorithm implementation (Lloyd), with empty-cluster repair and best-of-restarts selection.
    ///
    /// Each run initializes its centroids, then repeatedly assigns every sample to its nearest centroid and
    /// moves each centroid to the mean of its members, until the configured [`ConvergenceRule`] is satisfied
    /// or `max_iterations` is reached. Clusters left without samples receive a random sample, distinct from
    /// all other centroids. Out of `restarts` independent runs, the one with the lowest distortion is returned.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result), or [`KMeansError::InvalidConfig`]
    /// if **k** or the configuration are out of range.
    ///
    /// ## Example
    /// ```rust
    /// use kcluster::*;
    ///
    /// let samples = vec![0.1f64, 0.55, 12.2, 1.55, 2.3, 4.0, 1.8, 0.33, 0.2, 0.56, 12.3, 1.56, 3.1, 3.9, 1.6, 0.5];
    /// let kmean = KMeans::new(samples, 4, 4).unwrap();
    /// let conf = KMeansConfig::build().restarts(10).build();
    /// let result = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// assert_eq!(result.assignments[0], result.assignments[2]);
    /// assert_eq!(result.assignments[1], result.assignments[3]);
    /// println!("Error: {}", result.distsum);
    /// ```
    pub fn kmeans_lloyd<'a, F>(&self, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
                where F: Fn(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<()> {
        if k == 0 || k > self.sample_cnt {
            return Err(KMeansError::InvalidConfig(format!(
                "k must be within [1, {}] (amount of samples), got {}", self.sample_cnt, k)));
        }
        config.validate()?;
        crate::variants::Restarts::calculate(self, k, &init, config)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method randomly selects k samples as initial centroids. A drawn sample that
    /// equals (by value) an already selected centroid is drawn again, so all initial centroids are
    /// distinct as long as the samples contain at least k distinct vectors.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to [`KMeans::kmeans_lloyd`].
    pub fn init_random_sample(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<()> {
        crate::inits::randomsample::calculate(kmean, state, rnd)
    }

    /// K-Means++ initialization method, as implemented in Matlab
    ///
    /// ## Description
    /// This initialization method starts by selecting one sample as first centroid.
    /// Proceeding from there, the method iteratively selects one new centroid (per iteration) by calculating
    /// each sample's probability of "being a centroid". This probability is bigger, the farther away a sample
    /// is from its centroid. Then, one sample is randomly selected, while taking their probability of being
    /// the next centroid into account.
    /// (see: https://uk.mathworks.com/help/stats/kmeans.html#bueq7aj-5    Section: More About)
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to [`KMeans::kmeans_lloyd`].
    pub fn init_kmeanplusplus(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<()> {
        crate::inits::kmeanplusplus::calculate(kmean, state, rnd)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given centroids [row-major] as initial centroids. Every restart starts from these.
    pub fn init_precomputed(centroids: Vec<T>) -> impl Fn(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<()> {
        move |kmean: &KMeans<T>, state: &mut KMeansState<T>, _: &mut dyn RngCore| crate::inits::precomputed::calculate(kmean, state, &centroids)
    }
}
