use core::fmt::Debug;
use num_traits::float::FloatCore;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds, which covers
/// `f32` and `f64`. Only [`FloatCore`] is required, so no libm or hardware
/// FPU math is pulled in: the dispatcher needs `abs`, `nan`, `epsilon`,
/// `is_nan` and `is_finite`, nothing more.
pub trait Element: FloatCore + Debug {
    /// The sentinel written into every element of a failed result.
    #[inline]
    fn poison() -> Self {
        Self::nan()
    }
}

impl<T: FloatCore + Debug> Element for T {}
