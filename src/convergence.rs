use crate::Primitive;

/// Enum with the supported convergence rules.
/// These rules specify when a running k-means calculation has converged and its iteration stops.
/// Independent of the chosen rule, a run never exceeds the configured `max_iterations`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConvergenceRule<T: Primitive> {
	/// Stop once the relative improvement of the distortion (sum of squared sample-centroid distances)
	/// drops below **d**, i.e. when `d > 1 - (new_distsum / prev_distsum)`.
	/// A distortion of zero can not improve any further and stops immediately.
	/// ## Fields:
	/// - **d**: Convergence constant, a small positive number
	ErrorThreshold { d: T },
	/// Stop once no centroid changed its value during the last iteration.
	FixedPoint
}
impl<T: Primitive> ConvergenceRule<T> {
	/// Create the per-run stop logic.
	/// ## Arguments
	/// - **initial_centroids**: Centroids as produced by the initialization
	pub(crate) fn create_logic(&self, initial_centroids: &[T]) -> Box<dyn ConvergenceLogic<T>> {
		match *self {
			ConvergenceRule::ErrorThreshold{d} => Box::new(ErrorThresholdLogic {
				d,
				prev_error: T::infinity()
			}),
			ConvergenceRule::FixedPoint => Box::new(FixedPointLogic {
				prev_centroids: initial_centroids.to_vec()
			})
		}
	}

	pub(crate) fn validate(&self) -> Result<(), String> {
		match *self {
			ConvergenceRule::ErrorThreshold{d} if !(d.is_finite() && d > T::zero()) =>
				Err(format!("convergence constant d must be a finite positive number, got {}", d)),
			_ => Ok(())
		}
	}
}

pub(crate) trait ConvergenceLogic<T: Primitive> {
	/// Function that has to be called once an iteration of the calculation ended.
	/// ## Arguments
	/// - **centroids**: The centroids after the iteration
	/// - **error**: The new error (distsum), after the iteration
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation converged
	fn next(&mut self, centroids: &[T], error: T) -> bool;
}


pub(crate) struct ErrorThresholdLogic<T: Primitive> {
	d: T,
	prev_error: T
}
impl<T: Primitive> ConvergenceLogic<T> for ErrorThresholdLogic<T> {
	fn next(&mut self, _: &[T], error: T) -> bool {
		let prev_error = std::mem::replace(&mut self.prev_error, error);
		if error == T::zero() {
			return false;
		}
		if prev_error.is_infinite() { // first iteration never stops
			return true;
		}
		let improvement = T::one() - (error / prev_error);
		!(self.d > improvement)
	}
}


pub(crate) struct FixedPointLogic<T: Primitive> {
	prev_centroids: Vec<T>
}
impl<T: Primitive> ConvergenceLogic<T> for FixedPointLogic<T> {
	fn next(&mut self, centroids: &[T], _: T) -> bool {
		let unchanged = !centroids.iter().any(|c| c.is_nan()) && self.prev_centroids.as_slice() == centroids;
		if !unchanged {
			self.prev_centroids.clear();
			self.prev_centroids.extend_from_slice(centroids);
		}
		!unchanged
	}
}
