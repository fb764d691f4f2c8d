use super::{Dense, DenseMut, KernelError, Kernels};
use crate::traits::Element;

/// Default inverse capacity of [`ReferenceKernels`].
pub const MAX_INVERSE_DIM: usize = 32;

/// Naive, allocation-free, row-major kernels.
///
/// `CAP` is the largest square dimension `inverse` accepts. The row pivot
/// table is a `[usize; CAP]` on the stack; larger inputs get
/// [`KernelError::TooLarge`].
///
/// ```
/// use matcalc::kernels::{Dense, DenseMut, Kernels, ReferenceKernels};
///
/// let a = [4.0_f64, 7.0, 2.0, 6.0];
/// let mut c = [0.0; 4];
/// ReferenceKernels::new()
///     .inverse(&Dense::init(2, 2, &a), &mut DenseMut::init(2, 2, &mut c))
///     .unwrap();
/// assert!((c[0] - 0.6).abs() < 1e-12);
/// assert!((c[1] + 0.7).abs() < 1e-12);
///
/// // Accepts inverses up to 64x64
/// let big = ReferenceKernels::<64>;
/// assert_eq!(big.capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceKernels<const CAP: usize = MAX_INVERSE_DIM>;

impl ReferenceKernels {
    /// Reference kernels with the default inverse capacity.
    #[inline]
    pub const fn new() -> Self {
        ReferenceKernels
    }
}

impl<const CAP: usize> ReferenceKernels<CAP> {
    /// Largest square dimension `inverse` accepts.
    #[inline]
    pub const fn capacity(&self) -> usize {
        CAP
    }
}

fn elementwise<T: Element>(
    a: &Dense<'_, T>,
    b: &Dense<'_, T>,
    c: &mut DenseMut<'_, T>,
    f: impl Fn(T, T) -> T,
) -> Result<(), KernelError> {
    if !(a.is_consistent() && b.is_consistent() && c.is_consistent()) {
        return Err(KernelError::SizeMismatch);
    }
    if (a.rows, a.cols) != (b.rows, b.cols) || (a.rows, a.cols) != (c.rows, c.cols) {
        return Err(KernelError::SizeMismatch);
    }
    for ((out, &x), &y) in c.data.iter_mut().zip(a.data).zip(b.data) {
        *out = f(x, y);
    }
    Ok(())
}

impl<T: Element, const CAP: usize> Kernels<T> for ReferenceKernels<CAP> {
    fn add(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        elementwise(a, b, c, |x, y| x + y)
    }

    fn sub(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        elementwise(a, b, c, |x, y| x - y)
    }

    // (M×N) * (N×P) → (M×P)
    fn mul(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        if !(a.is_consistent() && b.is_consistent() && c.is_consistent()) {
            return Err(KernelError::SizeMismatch);
        }
        if a.cols != b.rows || c.rows != a.rows || c.cols != b.cols {
            return Err(KernelError::SizeMismatch);
        }
        let (m, n, p) = (a.rows, a.cols, b.cols);
        for i in 0..m {
            for j in 0..p {
                let mut sum = T::zero();
                for k in 0..n {
                    sum = sum + a.data[i * n + k] * b.data[k * p + j];
                }
                c.data[i * p + j] = sum;
            }
        }
        Ok(())
    }

    fn transpose(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError> {
        if !(a.is_consistent() && c.is_consistent()) {
            return Err(KernelError::SizeMismatch);
        }
        if c.rows != a.cols || c.cols != a.rows {
            return Err(KernelError::SizeMismatch);
        }
        let (m, n) = (a.rows, a.cols);
        for i in 0..m {
            for j in 0..n {
                c.data[j * m + i] = a.data[i * n + j];
            }
        }
        Ok(())
    }

    /// Gauss-Jordan elimination with partial pivoting, done in place in `c`.
    ///
    /// Row swaps are recorded in a stack table and undone as column swaps,
    /// in reverse order, once elimination is complete.
    fn inverse(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError> {
        if !(a.is_consistent() && c.is_consistent()) {
            return Err(KernelError::SizeMismatch);
        }
        let n = a.rows;
        if a.cols != n || c.rows != n || c.cols != n {
            return Err(KernelError::SizeMismatch);
        }
        if n > CAP {
            return Err(KernelError::TooLarge);
        }

        let m = &mut *c.data;
        m.copy_from_slice(a.data);
        let mut perm = [0usize; CAP];

        for col in 0..n {
            // Partial pivoting: find row with largest modulus in this column
            let mut max_row = col;
            let mut max_val = m[col * n + col].abs();
            for row in (col + 1)..n {
                let val = m[row * n + col].abs();
                if val > max_val {
                    max_val = val;
                    max_row = row;
                }
            }

            if max_val.is_nan() || max_val < T::epsilon() {
                return Err(KernelError::Singular);
            }

            perm[col] = max_row;
            if max_row != col {
                for j in 0..n {
                    m.swap(col * n + j, max_row * n + j);
                }
            }

            let inv_pivot = T::one() / m[col * n + col];
            m[col * n + col] = T::one();
            for j in 0..n {
                m[col * n + j] = m[col * n + j] * inv_pivot;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = m[row * n + col];
                if factor == T::zero() {
                    continue;
                }
                m[row * n + col] = T::zero();
                for j in 0..n {
                    m[row * n + j] = m[row * n + j] - factor * m[col * n + j];
                }
            }
        }

        for col in (0..n).rev() {
            let p = perm[col];
            if p != col {
                for row in 0..n {
                    m.swap(row * n + col, row * n + p);
                }
            }
        }

        Ok(())
    }
}
