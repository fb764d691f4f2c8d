//! Numeric-kernel backend interface.
//!
//! The dispatcher validates shapes and then hands well-formed operands to a
//! [`Kernels`] implementation. Kernels work on [`Dense`] / [`DenseMut`]
//! descriptors, which always carry a buffer, and repeat their own size
//! checks independently of the dispatcher.
//!
//! [`ReferenceKernels`] is the naive, allocation-free backend used by
//! default. Vendor backends (CMSIS-DSP bindings, SIMD kernels) plug in by
//! implementing [`Kernels`].

mod reference;

pub use reference::{ReferenceKernels, MAX_INVERSE_DIM};

use crate::traits::Element;

/// Failure status reported by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Operand dimensions or buffer lengths do not fit the operation.
    SizeMismatch,
    /// Matrix is singular or nearly singular.
    Singular,
    /// Dimension exceeds the backend's fixed working capacity.
    TooLarge,
}

impl core::fmt::Display for KernelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KernelError::SizeMismatch => write!(f, "kernel operand size mismatch"),
            KernelError::Singular => write!(f, "matrix is singular"),
            KernelError::TooLarge => write!(f, "matrix exceeds kernel capacity"),
        }
    }
}

impl core::error::Error for KernelError {}

/// Kernel-side read-only descriptor: dimensions bound to a row-major buffer.
#[derive(Debug, Clone, Copy)]
pub struct Dense<'a, T> {
    pub rows: usize,
    pub cols: usize,
    pub data: &'a [T],
}

impl<'a, T> Dense<'a, T> {
    /// Bind `data` as a `rows x cols` matrix. No copy, no check.
    #[inline]
    pub fn init(rows: usize, cols: usize, data: &'a [T]) -> Self {
        Self { rows, cols, data }
    }

    /// Buffer length agrees with the dimensions.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.data.len())
    }
}

/// Kernel-side mutable descriptor.
#[derive(Debug)]
pub struct DenseMut<'a, T> {
    pub rows: usize,
    pub cols: usize,
    pub data: &'a mut [T],
}

impl<'a, T> DenseMut<'a, T> {
    /// Bind `data` as a `rows x cols` matrix. No copy, no check.
    #[inline]
    pub fn init(rows: usize, cols: usize, data: &'a mut [T]) -> Self {
        Self { rows, cols, data }
    }

    /// Buffer length agrees with the dimensions.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.data.len())
    }
}

/// Capability set of a numeric backend.
///
/// Every method writes only into `c` and returns `Ok(())` on success. On
/// error the contents of `c` are unspecified; the dispatcher poisons them.
pub trait Kernels<T: Element> {
    /// `c = a + b`, elementwise.
    fn add(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError>;

    /// `c = a - b`, elementwise.
    fn sub(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError>;

    /// `c = a * b`, matrix product.
    fn mul(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError>;

    /// `c = aᵀ`.
    fn transpose(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError>;

    /// `c = a⁻¹`.
    fn inverse(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError>;
}

impl<T: Element, K: Kernels<T> + ?Sized> Kernels<T> for &K {
    #[inline]
    fn add(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        (**self).add(a, b, c)
    }

    #[inline]
    fn sub(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        (**self).sub(a, b, c)
    }

    #[inline]
    fn mul(
        &self,
        a: &Dense<'_, T>,
        b: &Dense<'_, T>,
        c: &mut DenseMut<'_, T>,
    ) -> Result<(), KernelError> {
        (**self).mul(a, b, c)
    }

    #[inline]
    fn transpose(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError> {
        (**self).transpose(a, c)
    }

    #[inline]
    fn inverse(&self, a: &Dense<'_, T>, c: &mut DenseMut<'_, T>) -> Result<(), KernelError> {
        (**self).inverse(a, c)
    }
}
