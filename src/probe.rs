//! Result probing: did a dispatch succeed or was its output poisoned?

use crate::traits::Element;
use crate::view::MatView;

/// `true` if `m` is detached or any of its active elements is NaN.
///
/// A missing buffer counts as a failure. Read-only, `O(rows * cols)`.
///
/// ```
/// use matcalc::{probe, MatView};
///
/// let ok = [1.0_f32, 2.0];
/// let bad = [1.0_f32, f32::NAN];
/// assert!(!probe::has_nan(&MatView::new(1, 2, &ok)));
/// assert!(probe::has_nan(&MatView::new(1, 2, &bad)));
/// assert!(probe::has_nan(&MatView::<f32>::detached(1, 2)));
/// ```
pub fn has_nan<T: Element>(m: &MatView<'_, T>) -> bool {
    match m.active() {
        Some(active) => active.iter().any(|x| x.is_nan()),
        None => true,
    }
}

/// Negation of [`has_nan`]: the buffer holds a usable result.
#[inline]
pub fn is_valid<T: Element>(m: &MatView<'_, T>) -> bool {
    !has_nan(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_buffer_is_valid() {
        let buf = [0.0_f64, -1.0, f64::INFINITY, 1e300];
        assert!(is_valid(&MatView::new(2, 2, &buf)));
    }

    #[test]
    fn single_nan_is_invalid() {
        let mut buf = [0.0_f32; 9];
        buf[8] = f32::NAN;
        assert!(has_nan(&MatView::new(3, 3, &buf)));
    }

    #[test]
    fn detached_is_invalid() {
        assert!(!is_valid(&MatView::<f64>::detached(3, 3)));
    }

    #[test]
    fn nan_outside_active_region_is_ignored() {
        let buf = [1.0_f32, 2.0, f32::NAN];
        assert!(is_valid(&MatView::new(1, 2, &buf)));
    }
}
