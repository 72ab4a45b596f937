//! Column-major shapes and index arithmetic.

use std::fmt;
use std::mem;

use smallvec::SmallVec;

use crate::error::{ExtentError, TensorError};

/// Inline capacity for per-dimension storage; higher ranks spill to the heap.
const INLINE_RANK: usize = 4;

/// Dimension lengths, column-major strides, and total element count.
///
/// A shape built by [`Shape::column_major`] has rank at least 1, every
/// length at least 1, `stride[0] == 1` and
/// `stride[k] == stride[k - 1] * len[k - 1]`.
/// The [`Default`] shape is the blank shape of an unbound tensor: rank 0
/// and zero elements.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    lengths: SmallVec<[usize; INLINE_RANK]>,
    strides: SmallVec<[usize; INLINE_RANK]>,
    nelem: usize,
}

impl Shape {
    /// Build a column-major shape from dimension lengths, first dimension
    /// fastest-varying.
    ///
    /// Each stride is the running product of the lengths consumed before
    /// it. Rejects an empty list, any zero length, and element counts that
    /// overflow `usize`.
    pub fn column_major(dims: &[usize]) -> Result<Self, ExtentError> {
        if dims.is_empty() {
            return Err(ExtentError::EmptyShape);
        }
        let mut strides = SmallVec::with_capacity(dims.len());
        let mut nelem = 1usize;
        for (dim, &len) in dims.iter().enumerate() {
            if len == 0 {
                return Err(ExtentError::ZeroLength { dim });
            }
            strides.push(nelem);
            nelem = nelem.checked_mul(len).ok_or(ExtentError::Overflow)?;
        }
        Ok(Self {
            lengths: SmallVec::from_slice(dims),
            strides,
            nelem,
        })
    }

    /// Number of dimensions. 0 for the blank shape.
    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    /// Total number of elements (product of all lengths).
    pub fn nelem(&self) -> usize {
        self.nelem
    }

    /// Length of dimension `dim`, if it exists.
    pub fn dim_len(&self, dim: usize) -> Option<usize> {
        self.lengths.get(dim).copied()
    }

    /// Stride (in elements) of dimension `dim`, if it exists.
    pub fn stride(&self, dim: usize) -> Option<usize> {
        self.strides.get(dim).copied()
    }

    /// Whether this is the blank shape of an unbound tensor.
    pub fn is_blank(&self) -> bool {
        self.lengths.is_empty()
    }

    /// All dimension lengths, in order.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// All strides, in order.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of bytes needed to store this shape's elements of type `T`.
    pub(crate) fn byte_len<T>(&self) -> Result<usize, ExtentError> {
        self.nelem
            .checked_mul(mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or(ExtentError::Overflow)
    }

    /// Linear offset of a multi-index: `sum(index[k] * stride[k])`.
    ///
    /// `index` must hold exactly one coordinate per dimension. Coordinates
    /// are not checked against their dimension's length, so an offset may
    /// land anywhere in (or beyond) the buffer.
    pub fn offset_of(&self, index: &[usize]) -> Result<usize, TensorError> {
        if index.len() != self.rank() {
            return Err(TensorError::IndexArity {
                expected: self.rank(),
                got: index.len(),
            });
        }
        Ok(index
            .iter()
            .zip(&self.strides)
            .fold(0usize, |acc, (&i, &s)| acc.wrapping_add(i.wrapping_mul(s))))
    }

    /// Whether two shapes have equal rank and identical lengths, position
    /// by position. Strides are not compared.
    pub fn same_as(&self, other: &Shape) -> bool {
        self.lengths == other.lengths
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("lengths", &self.lengths.as_slice())
            .field("strides", &self.strides.as_slice())
            .field("nelem", &self.nelem)
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, len) in self.lengths.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{len}")?;
        }
        write!(f, ")")
    }
}
