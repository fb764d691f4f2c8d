//! Buffer initialisation: clearing to zero and poisoning with NaN.
//!
//! Both operate on the handle's active region (`min(rows * cols, len)`
//! elements) and never write past the buffer.

use crate::traits::Element;
use crate::view::MatViewMut;

/// Clear every element to `0.0`.
///
/// A detached handle or one with a zero dimension is left untouched.
///
/// ```
/// use matcalc::{fill, MatViewMut};
///
/// let mut buf = [3.0_f32; 6];
/// fill::zero_fill(&mut MatViewMut::new(2, 3, &mut buf));
/// assert_eq!(buf, [0.0; 6]);
/// ```
pub fn zero_fill<T: Element>(m: &mut MatViewMut<'_, T>) {
    if m.rows() == 0 || m.cols() == 0 {
        return;
    }
    if let Some(active) = m.active_mut() {
        active.fill(T::zero());
    }
}

/// Overwrite every element with the NaN sentinel.
///
/// Only a missing buffer makes this a no-op; a zero dimension simply
/// means there is nothing to write.
pub fn poison_fill<T: Element>(m: &mut MatViewMut<'_, T>) {
    if let Some(active) = m.active_mut() {
        active.fill(T::poison());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fill_clears() {
        let mut buf = [1.5_f64, -2.0, 3.0, 4.0];
        zero_fill(&mut MatViewMut::new(2, 2, &mut buf));
        assert!(buf.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_fill_skips_zero_dims() {
        let mut buf = [1.0_f32; 4];
        zero_fill(&mut MatViewMut::new(0, 4, &mut buf));
        zero_fill(&mut MatViewMut::new(4, 0, &mut buf));
        assert_eq!(buf, [1.0; 4]);
    }

    #[test]
    fn zero_fill_detached_is_noop() {
        let mut m = MatViewMut::<f32>::detached(2, 2);
        zero_fill(&mut m);
        assert!(!m.has_buffer());
    }

    #[test]
    fn poison_fill_sets_every_element() {
        let mut buf = [1.0_f32; 6];
        poison_fill(&mut MatViewMut::new(3, 2, &mut buf));
        assert!(buf.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn fills_stay_inside_active_region() {
        let mut buf = [1.0_f64; 6];
        poison_fill(&mut MatViewMut::new(2, 2, &mut buf));
        assert!(buf[..4].iter().all(|x| x.is_nan()));
        assert_eq!(&buf[4..], &[1.0, 1.0]);

        // Dimensions larger than the buffer: clamp to the buffer.
        let mut small = [1.0_f64; 3];
        zero_fill(&mut MatViewMut::new(4, 4, &mut small));
        assert_eq!(small, [0.0; 3]);
    }
}
