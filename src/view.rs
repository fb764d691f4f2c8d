use crate::traits::Element;

/// Element count for a `rows x cols` shape, `None` on overflow.
#[inline]
fn element_count(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols)
}

#[inline]
fn well_formed(rows: usize, cols: usize, len: Option<usize>) -> bool {
    match len {
        Some(len) => rows > 0 && cols > 0 && element_count(rows, cols) == Some(len),
        None => false,
    }
}

#[inline]
fn active_len(rows: usize, cols: usize, len: usize) -> usize {
    element_count(rows, cols).unwrap_or(usize::MAX).min(len)
}

/// Read-only matrix handle over a caller-owned, row-major buffer.
///
/// The handle borrows the buffer, it never owns or copies it. A handle
/// may also be *detached* (no buffer at all), which every operation
/// treats as malformed input.
///
/// ```
/// use matcalc::MatView;
///
/// let buf = [1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let a = MatView::new(2, 3, &buf);
/// assert!(a.is_well_formed());
/// assert_eq!(a.get(1, 0), Some(4.0));
///
/// let short = MatView::new(3, 3, &buf);
/// assert!(!short.is_well_formed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatView<'a, T> {
    rows: usize,
    cols: usize,
    data: Option<&'a [T]>,
}

impl<'a, T> MatView<'a, T> {
    /// Bind a handle to `data`, interpreted as `rows x cols` row-major.
    #[inline]
    pub const fn new(rows: usize, cols: usize, data: &'a [T]) -> Self {
        Self {
            rows,
            cols,
            data: Some(data),
        }
    }

    /// A handle with dimensions but no backing buffer.
    #[inline]
    pub const fn detached(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: None,
        }
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The backing buffer, if any.
    #[inline]
    pub fn data(&self) -> Option<&'a [T]> {
        self.data
    }

    /// Buffer present, both dimensions non-zero, and buffer length equal to
    /// `rows * cols`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        well_formed(self.rows, self.cols, self.data.map(<[T]>::len))
    }

    /// The first `min(rows * cols, len)` elements of the buffer.
    #[inline]
    pub fn active(&self) -> Option<&'a [T]> {
        self.data
            .map(|d| &d[..active_len(self.rows, self.cols, d.len())])
    }

    /// Element at `(row, col)`, `None` when out of range or detached.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T>
    where
        T: Copy,
    {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let idx = row.checked_mul(self.cols)?.checked_add(col)?;
        self.data?.get(idx).copied()
    }
}

impl<T: Element> MatView<'_, T> {
    /// `true` if the handle is detached or any active element is NaN.
    ///
    /// Same as [`crate::probe::has_nan`].
    #[inline]
    pub fn has_nan(&self) -> bool {
        crate::probe::has_nan(self)
    }
}

/// Mutable matrix handle: the output side of a dispatch.
///
/// ```
/// use matcalc::MatViewMut;
///
/// let mut buf = [7.0_f32; 4];
/// let mut c = MatViewMut::new(2, 2, &mut buf);
/// c.zero_fill();
/// assert_eq!(c.get(1, 1), Some(0.0));
/// c.poison_fill();
/// assert!(c.has_nan());
/// ```
#[derive(Debug, PartialEq)]
pub struct MatViewMut<'a, T> {
    rows: usize,
    cols: usize,
    data: Option<&'a mut [T]>,
}

impl<'a, T> MatViewMut<'a, T> {
    /// Bind a handle to `data`, interpreted as `rows x cols` row-major.
    #[inline]
    pub fn new(rows: usize, cols: usize, data: &'a mut [T]) -> Self {
        Self {
            rows,
            cols,
            data: Some(data),
        }
    }

    /// A handle with dimensions but no backing buffer.
    #[inline]
    pub const fn detached(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: None,
        }
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The backing buffer, if any.
    #[inline]
    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// The backing buffer, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut [T]> {
        self.data.as_deref_mut()
    }

    /// Whether there is a buffer to write into at all.
    #[inline]
    pub fn has_buffer(&self) -> bool {
        self.data.is_some()
    }

    /// See [`MatView::is_well_formed`].
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        well_formed(self.rows, self.cols, self.data.as_ref().map(|d| d.len()))
    }

    /// The first `min(rows * cols, len)` elements of the buffer, mutably.
    #[inline]
    pub fn active_mut(&mut self) -> Option<&mut [T]> {
        let (rows, cols) = (self.rows, self.cols);
        self.data.as_deref_mut().map(|d| {
            let n = active_len(rows, cols, d.len());
            &mut d[..n]
        })
    }

    /// Reborrow as a read-only handle, e.g. to feed a result into the
    /// next dispatch.
    #[inline]
    pub fn as_view(&self) -> MatView<'_, T> {
        MatView {
            rows: self.rows,
            cols: self.cols,
            data: self.data.as_deref(),
        }
    }

    /// Element at `(row, col)`, `None` when out of range or detached.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T>
    where
        T: Copy,
    {
        self.as_view().get(row, col)
    }
}

impl<T: Element> MatViewMut<'_, T> {
    /// Clear the active region to zero. See [`crate::fill::zero_fill`].
    #[inline]
    pub fn zero_fill(&mut self) {
        crate::fill::zero_fill(self);
    }

    /// Overwrite the active region with NaN. See [`crate::fill::poison_fill`].
    #[inline]
    pub fn poison_fill(&mut self) {
        crate::fill::poison_fill(self);
    }

    /// See [`crate::probe::has_nan`].
    #[inline]
    pub fn has_nan(&self) -> bool {
        crate::probe::has_nan(&self.as_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_buffer_and_dims() {
        let buf = [0.0_f32; 6];
        assert!(MatView::new(2, 3, &buf).is_well_formed());
        assert!(MatView::new(3, 2, &buf).is_well_formed());
        assert!(!MatView::new(0, 3, &buf).is_well_formed());
        assert!(!MatView::new(2, 0, &buf).is_well_formed());
        assert!(!MatView::<f32>::detached(2, 3).is_well_formed());
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let buf = [0.0_f64; 5];
        assert!(!MatView::new(2, 3, &buf).is_well_formed());
        assert!(!MatView::new(2, 2, &buf).is_well_formed());
    }

    #[test]
    fn overflowing_dims_are_malformed() {
        let buf = [0.0_f64; 4];
        let v = MatView::new(usize::MAX, 2, &buf);
        assert!(!v.is_well_formed());
        assert_eq!(v.active().map(<[f64]>::len), Some(4));
    }

    #[test]
    fn get_on_overflowing_dims_is_none() {
        // half * 2 overflows usize
        let half = usize::MAX / 2 + 1;
        let mut buf = [1.0_f64, 2.0, 3.0, 4.0];
        assert_eq!(MatView::new(half + 1, 2, &buf).get(half, 1), None);
        assert_eq!(MatViewMut::new(half + 1, 2, &mut buf).get(half, 1), None);
        assert_eq!(MatView::new(half + 1, 2, &buf).get(0, 1), Some(2.0));
    }

    #[test]
    fn active_region_is_clamped() {
        let buf = [1.0_f32; 4];
        assert_eq!(MatView::new(3, 3, &buf).active().map(<[f32]>::len), Some(4));
        assert_eq!(MatView::new(1, 2, &buf).active().map(<[f32]>::len), Some(2));
        assert_eq!(MatView::new(0, 2, &buf).active().map(<[f32]>::len), Some(0));
        assert!(MatView::<f32>::detached(1, 1).active().is_none());
    }

    #[test]
    fn row_major_get() {
        let buf = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let v = MatView::new(2, 3, &buf);
        assert_eq!(v.get(0, 2), Some(3.0));
        assert_eq!(v.get(1, 0), Some(4.0));
        assert_eq!(v.get(2, 0), None);
        assert_eq!(v.get(0, 3), None);
    }

    #[test]
    fn as_view_reborrows_output() {
        let mut buf = [1.0_f64, 2.0, 3.0, 4.0];
        let c = MatViewMut::new(2, 2, &mut buf);
        let v = c.as_view();
        assert_eq!(v.shape(), (2, 2));
        assert_eq!(v.get(1, 1), Some(4.0));
        assert!(v.is_well_formed());
    }

    #[test]
    fn detached_mut_has_no_buffer() {
        let mut c = MatViewMut::<f32>::detached(2, 2);
        assert!(!c.has_buffer());
        assert!(c.active_mut().is_none());
        assert!(c.data().is_none());
    }
}
