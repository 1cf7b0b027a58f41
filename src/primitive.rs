use num::{Float, NumCast, Zero};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    num::ParseFloatError,
    ops::{AddAssign, SubAssign},
    str::FromStr,
};

/// Floating point types the clustering engine can operate on.
pub trait Primitive: AddAssign + SubAssign + Sum + Zero + Float + NumCast + SampleUniform
                + FromStr<Err = ParseFloatError> + PartialOrd + Copy + Default + Display + Debug
                + LowerExp + Send + Sync + 'static + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}
