//! # kcluster - API documentation
//!
//! kcluster is a small rust library (and command line tool) for the calculation of k-means-clustering
//! of N-dimensional real vectors.
//!
//! ## Design target
//! Samples are given using a raw row-major vector, instead of any high-level arithmetics / matrix crate
//! such as nalgebra or ndarray. Every calculation is fully reproducible: all randomness is drawn from the
//! random number generator configured in [`KMeansConfig`].
//!
//! Next to the plain Lloyd iteration, a calculation takes care of two things that tend to go wrong in
//! practice:
//! - **Empty clusters** are repaired by relocating their centroid onto a randomly chosen sample that
//!   doesn't coincide with any other centroid, so a run always ends up with `k` usable centroids.
//! - **Bad local optima** are mitigated by running the whole calculation multiple times (restarts) and
//!   keeping the run with the lowest total distortion.
//!
//! ## Supported centroid initializations
//! The outcome of each K-Means run depends on the initialization of its clusters. For a list of implemented
//! initialization methods, see [`KMeans`].
//!
//! ## Supported convergence rules
//! See [`ConvergenceRule`].
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kcluster::*;
//! use rand::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let (sample_cnt, sample_dims, k) = (2000, 8, 4);
//!
//!     // Generate some random data
//!     let mut rnd = StdRng::seed_from_u64(1337);
//!     let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rnd.gen());
//!
//!     // Calculate kmeans 10 times, using kmean++ as initialization-method, and keep the best run
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims)?;
//!     let conf = KMeansConfig::build()
//!         .random_generator(rnd)
//!         .convergence_rule(ConvergenceRule::ErrorThreshold { d: 0.0005 })
//!         .restarts(10)
//!         .build();
//!     let result = kmean.kmeans_lloyd(k, KMeans::init_kmeanplusplus, &conf)?;
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Cluster-Assignments: {:?}", result.assignments);
//!     println!("Error: {}", result.distsum);
//!     Ok(())
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kcluster::*;
//!
//! fn main() -> Result<()> {
//!     let kmean = KMeans::from_vectors(&[
//!         vec![0.1, 0.55, 12.2, 1.55],
//!         vec![2.3, 4.0, 1.8, 0.33],
//!         vec![0.2, 0.56, 12.3, 1.56],
//!         vec![3.1, 3.9, 1.6, 0.5],
//!     ])?;
//!
//!     let init_done = |_: &KMeansState<f64>| println!("Initialization completed.");
//!     let iteration_done = |s: &KMeansState<f64>, nr: usize, new_distsum: f64|
//!         println!("Iteration {} - Error: {:.2} -> {:.2}", nr, s.distsum, new_distsum);
//!     let restart_done = |s: &KMeansState<f64>, nr: usize| println!("Restart {} - Error: {:.4}", nr, s.distsum);
//!
//!     let conf = KMeansConfig::build()
//!         .init_done(&init_done)
//!         .iteration_done(&iteration_done)
//!         .restart_done(&restart_done)
//!         .restarts(5)
//!         .build();
//!     let result = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf)?;
//!
//!     assert_eq!(result.assignments[0], result.assignments[2]);
//!     assert_eq!(result.assignments[1], result.assignments[3]);
//!     Ok(())
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct. This struct is generic over the underlying primitive
//! type, that should be used for the calculations. To use KMeans, an instance of this struct is created, taking
//! over the sample data into its ownership. Construction fails for empty, ragged or non-finite data.
//!
//! Calling [`KMeans::kmeans_lloyd`] on the struct does not mutate it. Internally, a new instance of
//! [`KMeansState`] is used to store the state (and finally the result) of each run.
//!
//! The chosen centroid initialization method is passed in as argument. These initialization-method
//! implementations are static methods within the [`KMeans`] struct, which are simply passed in as reference.
//!
//! The text format understood by the `kcluster` binary is implemented in [`io`].

#[macro_use] mod helpers;
mod primitive;
mod error;
mod api;
mod convergence;
mod variants;
mod inits;
pub mod io;

pub use api::{ClusterId, InitDoneCallbackFn, IterationDoneCallbackFn, RestartDoneCallbackFn};
pub use api::{KMeansState, KMeansConfig, KMeansConfigBuilder, KMeans};
pub use convergence::ConvergenceRule;
pub use error::{KMeansError, Result};
pub use primitive::Primitive;
