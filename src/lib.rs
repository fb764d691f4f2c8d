//! # matcalc
//!
//! Shape-checked dense matrix arithmetic for embedded targets. no-std
//! compatible, allocation-free, and generic over the numeric backend.
//!
//! Matrices are caller-owned, row-major `f32`/`f64` buffers described by
//! lightweight handles. A single entry point runs one of five operations
//! (add, subtract, multiply, transpose, invert), validates operand shapes
//! first, and leaves the output either fully computed or entirely NaN.
//!
//! ## Quick start
//!
//! ```
//! use matcalc::{probe, Dispatcher, MatView, MatViewMut};
//!
//! let a = [2.0_f32, 0.0, 0.0, 2.0];
//! let mut c = [0.0_f32; 4];
//! let mut inv = MatViewMut::new(2, 2, &mut c);
//!
//! Dispatcher::reference().invert(&MatView::new(2, 2, &a), &mut inv).unwrap();
//! assert!(probe::is_valid(&inv.as_view()));
//! assert_eq!(c, [0.5, 0.0, 0.0, 0.5]);
//! ```
//!
//! Callers that poll buffers instead of checking results use [`calc`] with
//! a legacy selector character and test the output with [`probe::has_nan`]:
//!
//! ```
//! use matcalc::{calc, probe, MatView, MatViewMut};
//!
//! let a = [1.0_f32, 2.0, 2.0, 4.0]; // singular
//! let mut c = [0.0_f32; 4];
//! let mut out = MatViewMut::new(2, 2, &mut c);
//! calc(&MatView::new(2, 2, &a), None, &mut out, 'i');
//! assert!(probe::has_nan(&out.as_view()));
//! ```
//!
//! ## Modules
//!
//! - [`view`] — [`MatView`] / [`MatViewMut`] handles: `rows`, `cols`, and a
//!   borrowed buffer (or none, for a detached handle).
//! - [`fill`] — [`fill::zero_fill`] and [`fill::poison_fill`].
//! - [`probe`] — [`probe::has_nan`] / [`probe::is_valid`].
//! - [`dispatch`] — [`Op`], [`Dispatcher`], [`DispatchError`], [`calc`].
//! - [`kernels`] — the [`Kernels`] backend trait and the built-in
//!   [`ReferenceKernels`].
//! - [`traits`] — the [`Element`] scalar trait.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Link the standard library. Without it the crate is `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dispatch;
pub mod fill;
pub mod kernels;
pub mod probe;
pub mod traits;
pub mod view;

pub use dispatch::{calc, DispatchError, Dispatcher, ErrorKind, FailurePolicy, Op, Operand};
pub use kernels::{KernelError, Kernels, ReferenceKernels};
pub use traits::Element;
pub use view::{MatView, MatViewMut};
