//! Operation dispatch: shape validation, kernel invocation, failure signalling.
//!
//! [`Dispatcher::dispatch`] validates the operands for the requested [`Op`],
//! runs the matching kernel and leaves the output in one of two states:
//! a complete, finite result, or (under [`FailurePolicy::Poison`]) every
//! element NaN. The returned [`DispatchError`] says which check failed;
//! callers that only poll buffers can ignore it and use
//! [`crate::probe::has_nan`] instead.
//!
//! Validation order, first failure wins:
//!
//! 1. unknown selector ([`Dispatcher::dispatch_selector`] only)
//! 2. malformed lhs, then malformed output
//! 3. malformed or missing rhs (binary ops only)
//! 4. shape compatibility for the operation
//! 5. kernel status
//! 6. non-finite result
//!
//! # Example
//!
//! ```
//! use matcalc::{probe, Dispatcher, MatView, MatViewMut, Op};
//!
//! let a = [1.0_f32, 2.0, 3.0, 4.0];
//! let b = [5.0_f32, 6.0, 7.0, 8.0];
//! let mut c = [0.0_f32; 4];
//!
//! let dispatcher = Dispatcher::reference();
//! let mut out = MatViewMut::new(2, 2, &mut c);
//! dispatcher
//!     .dispatch(&MatView::new(2, 2, &a), Some(&MatView::new(2, 2, &b)), &mut out, Op::Add)
//!     .unwrap();
//! assert!(probe::is_valid(&out.as_view()));
//! assert_eq!(c, [6.0, 8.0, 10.0, 12.0]);
//! ```


use core::fmt;

use crate::fill::poison_fill;
use crate::kernels::{Dense, DenseMut, KernelError, Kernels, ReferenceKernels};
use crate::traits::Element;
use crate::view::{MatView, MatViewMut};

/// Matrix operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `C = A + B`
    Add,
    /// `C = A - B`
    Subtract,
    /// `C = A * B`
    Multiply,
    /// `C = Aᵀ`
    Transpose,
    /// `C = A⁻¹`
    Invert,
}

impl Op {
    /// Every operation, in selector order.
    pub const ALL: [Op; 5] = [Op::Add, Op::Subtract, Op::Multiply, Op::Transpose, Op::Invert];

    /// Single-character selector: `'+' '-' '*' 't' 'i'`.
    pub const fn selector(self) -> char {
        match self {
            Op::Add => '+',
            Op::Subtract => '-',
            Op::Multiply => '*',
            Op::Transpose => 't',
            Op::Invert => 'i',
        }
    }

    /// Parse a single-character selector.
    ///
    /// ```
    /// use matcalc::Op;
    /// assert_eq!(Op::from_selector('*'), Some(Op::Multiply));
    /// assert_eq!(Op::from_selector('x'), None);
    /// ```
    pub const fn from_selector(selector: char) -> Option<Op> {
        match selector {
            '+' => Some(Op::Add),
            '-' => Some(Op::Subtract),
            '*' => Some(Op::Multiply),
            't' => Some(Op::Transpose),
            'i' => Some(Op::Invert),
            _ => None,
        }
    }

    /// Whether the operation reads a second operand.
    pub const fn is_binary(self) -> bool {
        matches!(self, Op::Add | Op::Subtract | Op::Multiply)
    }
}

impl TryFrom<char> for Op {
    type Error = DispatchError;

    fn try_from(selector: char) -> Result<Self, Self::Error> {
        Op::from_selector(selector).ok_or(DispatchError::UnsupportedOp(selector))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "add"),
            Op::Subtract => write!(f, "subtract"),
            Op::Multiply => write!(f, "multiply"),
            Op::Transpose => write!(f, "transpose"),
            Op::Invert => write!(f, "invert"),
        }
    }
}

/// Which handle a [`DispatchError::Malformed`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Lhs,
    Rhs,
    Output,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Lhs => write!(f, "lhs"),
            Operand::Rhs => write!(f, "rhs"),
            Operand::Output => write!(f, "output"),
        }
    }
}

/// Coarse failure category, see [`DispatchError::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    ShapeMismatch,
    UnsupportedOp,
    BackendFailure,
}

/// Why a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// Detached buffer, zero dimension, or buffer length not `rows * cols`.
    /// Also returned for a missing rhs on a binary operation.
    Malformed(Operand),
    /// Operand shapes are incompatible with `op`.
    ShapeMismatch {
        op: Op,
        lhs: (usize, usize),
        rhs: Option<(usize, usize)>,
        out: (usize, usize),
    },
    /// Selector is not one of `'+' '-' '*' 't' 'i'`.
    UnsupportedOp(char),
    /// The kernel reported a failure.
    Backend(KernelError),
    /// The kernel succeeded but produced a NaN or infinite element.
    NonFinite,
}

impl DispatchError {
    /// Collapse to the four failure categories.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Malformed(_) => ErrorKind::MalformedInput,
            DispatchError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            DispatchError::UnsupportedOp(_) => ErrorKind::UnsupportedOp,
            DispatchError::Backend(_) | DispatchError::NonFinite => ErrorKind::BackendFailure,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Malformed(which) => write!(f, "malformed {} matrix", which),
            DispatchError::ShapeMismatch { op, lhs, rhs, out } => {
                write!(f, "shape mismatch for {}: lhs {}x{}", op, lhs.0, lhs.1)?;
                if let Some(rhs) = rhs {
                    write!(f, ", rhs {}x{}", rhs.0, rhs.1)?;
                }
                write!(f, ", out {}x{}", out.0, out.1)
            }
            DispatchError::UnsupportedOp(c) => write!(f, "unsupported operation selector {:?}", c),
            DispatchError::Backend(e) => write!(f, "backend failure: {}", e),
            DispatchError::NonFinite => write!(f, "result contains non-finite elements"),
        }
    }
}

impl core::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DispatchError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KernelError> for DispatchError {
    fn from(e: KernelError) -> Self {
        DispatchError::Backend(e)
    }
}

/// What happens to the output buffer when a dispatch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Overwrite the output with NaN, so pollers see the failure.
    #[default]
    Poison,
    /// Only return the error. The output may hold partial kernel writes.
    Report,
}

/// Check that every handle `op` needs is well-formed.
pub fn check_operands<T>(
    op: Op,
    a: &MatView<'_, T>,
    b: Option<&MatView<'_, T>>,
    c: &MatViewMut<'_, T>,
) -> Result<(), DispatchError> {
    if !a.is_well_formed() {
        return Err(DispatchError::Malformed(Operand::Lhs));
    }
    if !c.is_well_formed() {
        return Err(DispatchError::Malformed(Operand::Output));
    }
    if op.is_binary() && !b.is_some_and(|b| b.is_well_formed()) {
        return Err(DispatchError::Malformed(Operand::Rhs));
    }
    Ok(())
}

/// Check shape compatibility of `(rows, cols)` pairs for `op`.
///
/// `rhs` is ignored for unary operations.
///
/// ```
/// use matcalc::dispatch::check_shapes;
/// use matcalc::Op;
///
/// assert!(check_shapes(Op::Multiply, (2, 3), Some((3, 4)), (2, 4)).is_ok());
/// assert!(check_shapes(Op::Multiply, (2, 3), Some((2, 3)), (2, 3)).is_err());
/// assert!(check_shapes(Op::Transpose, (2, 3), None, (3, 2)).is_ok());
/// ```
pub fn check_shapes(
    op: Op,
    lhs: (usize, usize),
    rhs: Option<(usize, usize)>,
    out: (usize, usize),
) -> Result<(), DispatchError> {
    let (ar, ac) = lhs;
    let (cr, cc) = out;
    let ok = match op {
        Op::Add | Op::Subtract => {
            let (br, bc) = rhs.ok_or(DispatchError::Malformed(Operand::Rhs))?;
            ar == br && ac == bc && cr == ar && cc == ac
        }
        Op::Multiply => {
            let (br, bc) = rhs.ok_or(DispatchError::Malformed(Operand::Rhs))?;
            ac == br && cr == ar && cc == bc
        }
        Op::Transpose => cr == ac && cc == ar,
        Op::Invert => ar == ac && cr == ar && cc == ac,
    };
    if ok {
        Ok(())
    } else {
        Err(DispatchError::ShapeMismatch {
            op,
            lhs,
            rhs: if op.is_binary() { rhs } else { None },
            out,
        })
    }
}

/// Validates operands and routes each [`Op`] to a [`Kernels`] backend.
///
/// Stateless between calls: the only fields are the backend and the
/// failure policy. Writes only to the output handle and never allocates.
#[derive(Debug, Clone)]
pub struct Dispatcher<K = ReferenceKernels> {
    kernels: K,
    policy: FailurePolicy,
}

impl Dispatcher<ReferenceKernels> {
    /// Dispatcher over the built-in [`ReferenceKernels`], poisoning on failure.
    pub const fn reference() -> Self {
        Self {
            kernels: ReferenceKernels::new(),
            policy: FailurePolicy::Poison,
        }
    }
}

impl Default for Dispatcher<ReferenceKernels> {
    fn default() -> Self {
        Self::reference()
    }
}

impl<K> Dispatcher<K> {
    /// Dispatcher over `kernels`, poisoning on failure.
    pub fn new(kernels: K) -> Self {
        Self {
            kernels,
            policy: FailurePolicy::Poison,
        }
    }

    /// Replace the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn kernels(&self) -> &K {
        &self.kernels
    }

    /// Run `op` on `a` (and `b` for binary operations) into `c`.
    ///
    /// `b` is ignored by [`Op::Transpose`] and [`Op::Invert`]. On error the
    /// output is poisoned unless the policy is [`FailurePolicy::Report`].
    /// `a` and `b` are never written.
    pub fn dispatch<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: Option<&MatView<'_, T>>,
        c: &mut MatViewMut<'_, T>,
        op: Op,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        let result = self.execute(a, b, c, op);
        if let Err(err) = result {
            self.fail(c, err);
        }
        result
    }

    /// Like [`dispatch`](Self::dispatch), with the operation given as a
    /// legacy selector character. An unknown selector fails before any
    /// operand is looked at.
    ///
    /// ```
    /// use matcalc::{Dispatcher, DispatchError, MatView, MatViewMut};
    ///
    /// let a = [1.0_f32, 2.0, 3.0, 4.0];
    /// let mut c = [0.0_f32; 4];
    /// let mut out = MatViewMut::new(2, 2, &mut c);
    /// let err = Dispatcher::reference()
    ///     .dispatch_selector(&MatView::new(2, 2, &a), None, &mut out, '/')
    ///     .unwrap_err();
    /// assert_eq!(err, DispatchError::UnsupportedOp('/'));
    /// assert!(out.has_nan());
    /// ```
    pub fn dispatch_selector<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: Option<&MatView<'_, T>>,
        c: &mut MatViewMut<'_, T>,
        selector: char,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        match Op::try_from(selector) {
            Ok(op) => self.dispatch(a, b, c, op),
            Err(err) => {
                self.fail(c, err);
                Err(err)
            }
        }
    }

    /// `c = a + b`
    pub fn add<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: &MatView<'_, T>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        self.dispatch(a, Some(b), c, Op::Add)
    }

    /// `c = a - b`
    pub fn sub<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: &MatView<'_, T>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        self.dispatch(a, Some(b), c, Op::Subtract)
    }

    /// `c = a * b`
    pub fn mul<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: &MatView<'_, T>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        self.dispatch(a, Some(b), c, Op::Multiply)
    }

    /// `c = aᵀ`
    pub fn transpose<T: Element>(
        &self,
        a: &MatView<'_, T>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        self.dispatch(a, None, c, Op::Transpose)
    }

    /// `c = a⁻¹`
    pub fn invert<T: Element>(
        &self,
        a: &MatView<'_, T>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        self.dispatch(a, None, c, Op::Invert)
    }

    fn execute<T: Element>(
        &self,
        a: &MatView<'_, T>,
        b: Option<&MatView<'_, T>>,
        c: &mut MatViewMut<'_, T>,
        op: Op,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        check_operands(op, a, b, c)?;
        check_shapes(op, a.shape(), b.map(|b| b.shape()), c.shape())?;
        self.invoke(op, a, b, c)
    }

    fn invoke<T: Element>(
        &self,
        op: Op,
        a: &MatView<'_, T>,
        b: Option<&MatView<'_, T>>,
        c: &mut MatViewMut<'_, T>,
    ) -> Result<(), DispatchError>
    where
        K: Kernels<T>,
    {
        let lhs = a
            .data()
            .map(|d| Dense::init(a.rows(), a.cols(), d))
            .ok_or(DispatchError::Malformed(Operand::Lhs))?;
        let rhs = || {
            b.and_then(|b| b.data().map(|d| Dense::init(b.rows(), b.cols(), d)))
                .ok_or(DispatchError::Malformed(Operand::Rhs))
        };
        let (rows, cols) = c.shape();
        let mut out = c
            .data_mut()
            .map(|d| DenseMut::init(rows, cols, d))
            .ok_or(DispatchError::Malformed(Operand::Output))?;

        let status = match op {
            Op::Add => self.kernels.add(&lhs, &rhs()?, &mut out),
            Op::Subtract => self.kernels.sub(&lhs, &rhs()?, &mut out),
            Op::Multiply => self.kernels.mul(&lhs, &rhs()?, &mut out),
            Op::Transpose => self.kernels.transpose(&lhs, &mut out),
            Op::Invert => self.kernels.inverse(&lhs, &mut out),
        };
        status?;

        if out.data.iter().any(|x| !x.is_finite()) {
            return Err(DispatchError::NonFinite);
        }
        log::trace!("{} {}x{} done", op, rows, cols);
        Ok(())
    }

    fn fail<T: Element>(&self, c: &mut MatViewMut<'_, T>, err: DispatchError) {
        match err.kind() {
            ErrorKind::BackendFailure => log::warn!("matrix dispatch failed: {}", err),
            _ => log::debug!("matrix dispatch rejected: {}", err),
        }
        if self.policy == FailurePolicy::Poison {
            poison_fill(c);
        }
    }
}

/// Legacy entry point: dispatch by selector with [`ReferenceKernels`],
/// poisoning `c` on any failure. There is no return value; poll the output
/// with [`crate::probe::has_nan`].
///
/// ```
/// use matcalc::{calc, probe, MatView, MatViewMut};
///
/// // 2x3 * 2x3: inner dimensions disagree
/// let a = [1.0_f32; 6];
/// let b = [1.0_f32; 6];
/// let mut c = [0.0_f32; 6];
/// let mut out = MatViewMut::new(2, 3, &mut c);
/// calc(&MatView::new(2, 3, &a), Some(&MatView::new(2, 3, &b)), &mut out, '*');
/// assert!(probe::has_nan(&out.as_view()));
/// assert!(c.iter().all(|x| x.is_nan()));
/// ```
pub fn calc<T: Element>(
    a: &MatView<'_, T>,
    b: Option<&MatView<'_, T>>,
    c: &mut MatViewMut<'_, T>,
    selector: char,
) {
    let _ = Dispatcher::reference().dispatch_selector(a, b, c, selector);
}
