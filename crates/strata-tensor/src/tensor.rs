//! The strided tensor container and its ownership state machine.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use strata_core::{is_valid_alignment, measure_alignment, Element, DEFAULT_ALIGN};
use tracing::debug;

use crate::error::TensorError;
use crate::raw::{self, RawBlock};
use crate::shape::Shape;

/// Which of the three binding states a tensor is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// No buffer is bound.
    Unset,
    /// The tensor allocated its buffer and will release it.
    Owned,
    /// The tensor views caller memory it must not release.
    Borrowed,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Owned => write!(f, "owned"),
            Self::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// Buffer binding. Release logic exists only on the `Owned` payload.
enum Storage<'a, T> {
    Unset,
    Owned(RawBlock<T>),
    Borrowed(&'a mut [T]),
}

/// A fixed-shape, column-major, multi-dimensional array.
///
/// The tensor either owns a heap buffer (optionally aligned to a
/// power-of-two byte boundary) or borrows caller memory for `'a`. See the
/// [crate docs](crate) for the state machine.
///
/// ```
/// use strata_tensor::Tensor;
///
/// let mut t = Tensor::<f64>::allocated(&[2, 3, 4]).unwrap();
/// assert_eq!(t.size(), 24);
/// assert_eq!(t.stride(2), Some(6));
/// t[[1, 2, 3]] = 5.0;
/// assert_eq!(t[23], 5.0);
/// ```
pub struct Tensor<'a, T: Element = f64> {
    shape: Shape,
    alignment: usize,
    storage: Storage<'a, T>,
}

impl<'a, T: Element> Tensor<'a, T> {
    /// Create an Unset tensor.
    pub fn new() -> Self {
        Self {
            shape: Shape::default(),
            alignment: 0,
            storage: Storage::Unset,
        }
    }

    /// Create a tensor that owns a fresh buffer of the given shape.
    pub fn allocated(dims: &[usize]) -> Result<Self, TensorError> {
        let mut t = Self::new();
        t.allocate(dims)?;
        Ok(t)
    }

    /// Create a tensor that owns a fresh buffer aligned to `align_bytes`.
    pub fn aligned(align_bytes: usize, dims: &[usize]) -> Result<Self, TensorError> {
        let mut t = Self::new();
        t.aligned_allocate(align_bytes, dims)?;
        Ok(t)
    }

    /// Create a tensor viewing `foreign` with the given shape.
    pub fn assigned(foreign: &'a mut [T], dims: &[usize]) -> Result<Self, TensorError> {
        let mut t = Self::new();
        t.assign(foreign, dims)?;
        Ok(t)
    }

    /// Allocate a zero-initialised buffer for the shape `dims`.
    pub fn allocate(&mut self, dims: &[usize]) -> Result<(), TensorError> {
        self.require_unset()?;
        let shape = Shape::column_major(dims)?;
        shape.byte_len::<T>()?;
        let block = RawBlock::<T>::allocate(shape.nelem())?;
        let alignment = measure_alignment(block.as_slice().as_ptr().addr());
        debug!(
            shape = %shape,
            element = T::NAME,
            bytes = block.allocated_bytes(),
            alignment,
            "tensor allocated"
        );
        self.bind(shape, alignment, Storage::Owned(block));
        Ok(())
    }

    /// Allocate a zero-initialised buffer whose first element sits on a
    /// multiple of `align_bytes`.
    ///
    /// The block is over-allocated by `align_bytes` bytes and the usable
    /// start shifted forward; the unshifted origin is what gets released.
    /// `align_bytes` must be a power of two of at least 2.
    pub fn aligned_allocate(
        &mut self,
        align_bytes: usize,
        dims: &[usize],
    ) -> Result<(), TensorError> {
        self.require_unset()?;
        if !is_valid_alignment(align_bytes) {
            return Err(TensorError::InvalidAlignment {
                requested: align_bytes,
            });
        }
        let shape = Shape::column_major(dims)?;
        shape.byte_len::<T>()?;
        let block = RawBlock::<T>::allocate_aligned(shape.nelem(), align_bytes)?;
        let alignment = measure_alignment(block.as_slice().as_ptr().addr()).min(align_bytes);
        debug!(
            shape = %shape,
            element = T::NAME,
            bytes = block.allocated_bytes(),
            shift = block.shift(),
            alignment,
            "tensor allocated (aligned)"
        );
        self.bind(shape, alignment, Storage::Owned(block));
        Ok(())
    }

    /// [`aligned_allocate`](Self::aligned_allocate) with
    /// [`DEFAULT_ALIGN`] bytes.
    pub fn aligned_allocate_default(&mut self, dims: &[usize]) -> Result<(), TensorError> {
        self.aligned_allocate(DEFAULT_ALIGN, dims)
    }

    /// View the first `product(dims)` elements of `foreign` with the shape
    /// `dims`.
    ///
    /// The tensor must be Unset; re-pointing a Borrowed tensor requires an
    /// explicit [`unassign`](Self::unassign) first.
    pub fn assign(&mut self, foreign: &'a mut [T], dims: &[usize]) -> Result<(), TensorError> {
        self.require_unset()?;
        let shape = Shape::column_major(dims)?;
        if foreign.len() < shape.nelem() {
            return Err(TensorError::ForeignTooShort {
                required: shape.nelem(),
                provided: foreign.len(),
            });
        }
        let view = &mut foreign[..shape.nelem()];
        let alignment = measure_alignment(view.as_ptr().addr());
        debug!(shape = %shape, element = T::NAME, alignment, "tensor assigned");
        self.bind(shape, alignment, Storage::Borrowed(view));
        Ok(())
    }

    /// Release an Owned buffer and return to Unset.
    pub fn deallocate(&mut self) -> Result<(), TensorError> {
        if !matches!(self.storage, Storage::Owned(_)) {
            return Err(TensorError::Unbound {
                op: "deallocate",
                state: self.ownership(),
            });
        }
        debug!(shape = %self.shape, element = T::NAME, "tensor deallocated");
        self.reset();
        Ok(())
    }

    /// Drop a Borrowed view and return to Unset. The caller's memory is
    /// left untouched.
    pub fn unassign(&mut self) -> Result<(), TensorError> {
        if !matches!(self.storage, Storage::Borrowed(_)) {
            return Err(TensorError::Unbound {
                op: "unassign",
                state: self.ownership(),
            });
        }
        debug!(shape = %self.shape, element = T::NAME, "tensor unassigned");
        self.reset();
        Ok(())
    }

    fn require_unset(&self) -> Result<(), TensorError> {
        match self.ownership() {
            Ownership::Unset => Ok(()),
            state => Err(TensorError::DoubleBind { state }),
        }
    }

    fn bind(&mut self, shape: Shape, alignment: usize, storage: Storage<'a, T>) {
        debug_assert_eq!(shape.is_blank(), matches!(storage, Storage::Unset));
        self.shape = shape;
        self.alignment = alignment;
        self.storage = storage;
    }

    fn reset(&mut self) {
        // Dropping an `Owned` payload frees it; a `Borrowed` one just ends the borrow.
        self.bind(Shape::default(), 0, Storage::Unset);
    }

    /// Current binding state.
    pub fn ownership(&self) -> Ownership {
        match self.storage {
            Storage::Unset => Ownership::Unset,
            Storage::Owned(_) => Ownership::Owned,
            Storage::Borrowed(_) => Ownership::Borrowed,
        }
    }

    /// Whether the tensor owns its buffer.
    pub fn is_allocated(&self) -> bool {
        self.ownership() == Ownership::Owned
    }

    /// Whether the tensor views caller memory.
    pub fn is_assigned(&self) -> bool {
        self.ownership() == Ownership::Borrowed
    }

    /// Whether the tensor is bound at all.
    pub fn is_set(&self) -> bool {
        self.ownership() != Ownership::Unset
    }

    /// Total number of elements. 0 while Unset.
    pub fn size(&self) -> usize {
        self.shape.nelem()
    }

    /// Length of dimension `dim`.
    pub fn dim_size(&self, dim: usize) -> Option<usize> {
        self.shape.dim_len(dim)
    }

    /// Stride of dimension `dim`, in elements.
    pub fn stride(&self, dim: usize) -> Option<usize> {
        self.shape.stride(dim)
    }

    /// Number of dimensions. 0 while Unset.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// The full shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Largest power of two (at most 512) dividing the address of the
    /// first element. For aligned allocations this never exceeds the
    /// requested alignment. 0 while Unset.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Whether `self` and `other` have the same rank and lengths.
    pub fn same_shape<U: Element>(&self, other: &Tensor<'_, U>) -> bool {
        self.shape.same_as(&other.shape)
    }

    /// The usable buffer, `size()` elements long. Empty while Unset.
    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Unset => &[],
            Storage::Owned(block) => block.as_slice(),
            Storage::Borrowed(view) => view,
        }
    }

    /// The usable buffer, mutably. Empty while Unset.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Unset => &mut [],
            Storage::Owned(block) => block.as_mut_slice(),
            Storage::Borrowed(view) => view,
        }
    }

    /// Element at linear offset `i`.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_slice().get(i)
    }

    /// Mutable element at linear offset `i`.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(i)
    }

    /// Linear offset of a multi-index. See [`Shape::offset_of`].
    pub fn offset_of(&self, index: &[usize]) -> Result<usize, TensorError> {
        self.shape.offset_of(index)
    }

    /// Element at a multi-index.
    ///
    /// Returns `Ok(None)` when the resolved offset falls outside the buffer.
    pub fn at(&self, index: &[usize]) -> Result<Option<&T>, TensorError> {
        let offset = self.offset_of(index)?;
        Ok(self.get(offset))
    }

    /// Mutable element at a multi-index.
    pub fn at_mut(&mut self, index: &[usize]) -> Result<Option<&mut T>, TensorError> {
        let offset = self.offset_of(index)?;
        Ok(self.get_mut(offset))
    }

    /// Size of the usable buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.size() * mem::size_of::<T>()
    }

    /// The usable buffer as raw bytes, for bulk reads and writes by an
    /// I/O layer.
    pub fn as_bytes(&self) -> &[u8] {
        raw::bytes_of(self.as_slice())
    }

    /// The usable buffer as mutable raw bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        raw::bytes_of_mut(self.as_mut_slice())
    }
}

/// Whether `a` and `b` have equal rank and identical per-dimension
/// lengths, in order. Strides and element types are not compared.
pub fn same_shape<A: Element, B: Element>(a: &Tensor<'_, A>, b: &Tensor<'_, B>) -> bool {
    a.same_shape(b)
}

impl<T: Element> Default for Tensor<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for Tensor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("element", &T::NAME)
            .field("ownership", &self.ownership())
            .field("lengths", &self.shape.lengths())
            .field("strides", &self.shape.strides())
            .field("alignment", &self.alignment)
            .finish()
    }
}

impl<T: Element> Index<usize> for Tensor<'_, T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}

impl<T: Element> IndexMut<usize> for Tensor<'_, T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}

impl<T: Element, const N: usize> Index<[usize; N]> for Tensor<'_, T> {
    type Output = T;

    fn index(&self, index: [usize; N]) -> &T {
        match self.offset_of(&index) {
            Ok(offset) => &self.as_slice()[offset],
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Element, const N: usize> IndexMut<[usize; N]> for Tensor<'_, T> {
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        match self.offset_of(&index) {
            Ok(offset) => &mut self.as_mut_slice()[offset],
            Err(e) => panic!("{e}"),
        }
    }
}
