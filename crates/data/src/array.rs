//! Column-major dense arrays of `f64` with NaN as the missing value.

use crate::error::DataError;

/// Read/write access to a rank-`N` field of `f64` values.
///
/// Implemented by [`DenseArray`] and by the forecast and observation fields,
/// so helpers can work on any of them without caring about the axis
/// collections attached.
pub trait Field<const N: usize> {
    /// Extent along every axis.
    fn shape(&self) -> [usize; N];

    /// Value at a multi-index. Missing values are NaN.
    fn value(&self, index: [usize; N]) -> f64;

    /// Overwrites the value at a multi-index.
    fn set_value(&mut self, index: [usize; N], value: f64);

    /// Number of NaN cells in the field.
    fn count_missing(&self) -> usize;
}

/// Owned rank-`N` array stored in column-major (first index fastest) order.
///
/// # Example
///
/// ```
/// use anen_data::DenseArray;
///
/// let mut a = DenseArray::<3>::filled([2, 3, 4], 0.0);
/// a.set([1, 2, 3], 5.0);
/// assert_eq!(a.get([1, 2, 3]), 5.0);
/// assert_eq!(a.as_slice()[1 + 2 * 2 + 3 * 6], 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray<const N: usize> {
    shape: [usize; N],
    strides: [usize; N],
    data: Vec<f64>,
}

fn column_major_strides<const N: usize>(shape: &[usize; N]) -> [usize; N] {
    let mut strides = [0; N];
    let mut acc = 1;
    for (stride, &extent) in strides.iter_mut().zip(shape.iter()) {
        *stride = acc;
        acc *= extent;
    }
    strides
}

impl<const N: usize> DenseArray<N> {
    /// Creates an array of the given shape filled with NaN.
    pub fn new(shape: [usize; N]) -> Self {
        Self::filled(shape, f64::NAN)
    }

    /// Creates an array of the given shape filled with `value`.
    pub fn filled(shape: [usize; N], value: f64) -> Self {
        let volume = shape.iter().product();
        Self {
            strides: column_major_strides(&shape),
            shape,
            data: vec![value; volume],
        }
    }

    /// Wraps a column-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ShapeMismatch`] if `data.len()` is not the
    /// product of `shape`.
    pub fn from_vec(shape: [usize; N], data: Vec<f64>) -> Result<Self, DataError> {
        let volume: usize = shape.iter().product();
        if data.len() != volume {
            return Err(DataError::ShapeMismatch {
                expected: volume,
                got: data.len(),
            });
        }
        Ok(Self {
            strides: column_major_strides(&shape),
            shape,
            data,
        })
    }

    /// Extent along every axis.
    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if any axis has zero extent.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat offset of a multi-index.
    #[inline]
    pub fn offset(&self, index: [usize; N]) -> usize {
        let mut offset = 0;
        for d in 0..N {
            debug_assert!(
                index[d] < self.shape[d],
                "index {} out of bounds for axis {d} with extent {}",
                index[d],
                self.shape[d]
            );
            offset += index[d] * self.strides[d];
        }
        offset
    }

    /// Value at a multi-index.
    #[inline]
    pub fn get(&self, index: [usize; N]) -> f64 {
        self.data[self.offset(index)]
    }

    /// Overwrites the value at a multi-index.
    #[inline]
    pub fn set(&mut self, index: [usize; N], value: f64) {
        let offset = self.offset(index);
        self.data[offset] = value;
    }

    /// Column-major backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable column-major backing buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the array and returns its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copies `block` into this array starting at position `start` of the
    /// leading axis. All other axes must agree.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::AxisMismatch`] if a trailing axis differs or the
    /// block does not fit on the leading axis.
    pub fn copy_leading_block(
        &mut self,
        start: usize,
        block: &DenseArray<N>,
    ) -> Result<(), DataError> {
        if N == 0 {
            return Ok(());
        }
        for d in 1..N {
            if block.shape[d] != self.shape[d] {
                return Err(DataError::AxisMismatch {
                    axis: "trailing",
                    expected: self.shape[d],
                    got: block.shape[d],
                });
            }
        }
        let run = block.shape[0];
        if start + run > self.shape[0] {
            return Err(DataError::AxisMismatch {
                axis: "leading",
                expected: self.shape[0],
                got: start + run,
            });
        }
        if run == 0 {
            return Ok(());
        }
        let lead = self.shape[0];
        for (r, src) in block.data.chunks_exact(run).enumerate() {
            let dst = start + r * lead;
            self.data[dst..dst + run].copy_from_slice(src);
        }
        Ok(())
    }
}

impl<const N: usize> Field<N> for DenseArray<N> {
    fn shape(&self) -> [usize; N] {
        self.shape
    }

    fn value(&self, index: [usize; N]) -> f64 {
        self.get(index)
    }

    fn set_value(&mut self, index: [usize; N], value: f64) {
        self.set(index, value);
    }

    fn count_missing(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_all_nan() {
        let a = DenseArray::<4>::new([2, 1, 3, 2]);
        assert_eq!(a.len(), 12);
        assert_eq!(a.count_missing(), 12);
    }

    #[test]
    fn column_major_layout() {
        let data: Vec<f64> = (0..24).map(f64::from).collect();
        let a = DenseArray::<3>::from_vec([2, 3, 4], data).unwrap();
        assert_eq!(a.get([0, 0, 0]), 0.0);
        assert_eq!(a.get([1, 0, 0]), 1.0);
        assert_eq!(a.get([0, 1, 0]), 2.0);
        assert_eq!(a.get([0, 0, 1]), 6.0);
        assert_eq!(a.get([1, 2, 3]), 23.0);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = DenseArray::<2>::from_vec([3, 3], vec![0.0; 8]).unwrap_err();
        assert_eq!(
            err,
            DataError::ShapeMismatch {
                expected: 9,
                got: 8
            }
        );
    }

    #[test]
    fn set_then_get() {
        let mut a = DenseArray::<2>::filled([3, 2], 0.0);
        a.set([2, 1], -4.5);
        assert_eq!(a.get([2, 1]), -4.5);
        assert_eq!(a.as_slice()[5], -4.5);
    }

    #[test]
    fn zero_extent_is_empty() {
        let a = DenseArray::<3>::new([4, 0, 2]);
        assert!(a.is_empty());
        assert_eq!(a.shape(), [4, 0, 2]);
    }

    #[test]
    fn field_trait_delegates() {
        let mut a = DenseArray::<2>::filled([2, 2], 1.0);
        Field::set_value(&mut a, [0, 1], f64::NAN);
        assert!(Field::value(&a, [0, 1]).is_nan());
        assert_eq!(Field::shape(&a), [2, 2]);
        assert_eq!(a.count_missing(), 1);
    }

    #[test]
    fn copy_leading_block_places_rows() {
        let mut full = DenseArray::<3>::new([5, 2, 2]);
        let block = DenseArray::<3>::from_vec([2, 2, 2], (0..8).map(f64::from).collect()).unwrap();
        full.copy_leading_block(3, &block).unwrap();
        for s in 0..2 {
            for t in 0..2 {
                for f in 0..2 {
                    assert_eq!(full.get([3 + s, t, f]), block.get([s, t, f]));
                }
            }
        }
        assert!(full.get([0, 0, 0]).is_nan());
        assert!(full.get([2, 1, 1]).is_nan());
    }

    #[test]
    fn copy_leading_block_rejects_overflow() {
        let mut full = DenseArray::<2>::new([3, 2]);
        let block = DenseArray::<2>::filled([2, 2], 0.0);
        assert!(full.copy_leading_block(2, &block).is_err());
    }

    #[test]
    fn copy_leading_block_rejects_trailing_mismatch() {
        let mut full = DenseArray::<2>::new([3, 2]);
        let block = DenseArray::<2>::filled([1, 3], 0.0);
        let err = full.copy_leading_block(0, &block).unwrap_err();
        assert_eq!(
            err,
            DataError::AxisMismatch {
                axis: "trailing",
                expected: 2,
                got: 3
            }
        );
    }
}
