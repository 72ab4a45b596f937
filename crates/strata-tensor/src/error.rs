//! Tensor-specific error types.

use std::error::Error;
use std::fmt;

use crate::tensor::Ownership;

/// Why a requested shape or element count was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtentError {
    /// No dimensions were given.
    EmptyShape,
    /// A dimension has length zero.
    ZeroLength {
        /// Index of the offending dimension.
        dim: usize,
    },
    /// The element count or byte size does not fit in the address space.
    Overflow,
}

impl fmt::Display for ExtentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyShape => write!(f, "shape has no dimensions"),
            Self::ZeroLength { dim } => write!(f, "dimension {dim} has length 0"),
            Self::Overflow => write!(f, "element count overflows the address space"),
        }
    }
}

/// Errors that can occur during tensor operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorError {
    /// A bind (`allocate`, `aligned_allocate`, `assign`) was attempted on a
    /// tensor that is not Unset.
    DoubleBind {
        /// State the tensor was in.
        state: Ownership,
    },
    /// An unbind was attempted from a state it does not apply to
    /// (`deallocate` on a non-Owned or `unassign` on a non-Borrowed tensor).
    Unbound {
        /// Name of the rejected operation.
        op: &'static str,
        /// State the tensor was in.
        state: Ownership,
    },
    /// The requested shape is not valid.
    InvalidExtent {
        /// What was wrong with it.
        reason: ExtentError,
    },
    /// The requested byte alignment is not a power of two of at least 2.
    InvalidAlignment {
        /// The rejected alignment in bytes.
        requested: usize,
    },
    /// The heap could not provide the buffer.
    AllocationFailure {
        /// Number of bytes requested from the allocator.
        bytes: usize,
    },
    /// Caller memory passed to `assign` is shorter than the shape needs.
    ForeignTooShort {
        /// Elements required by the shape.
        required: usize,
        /// Elements available in the caller's buffer.
        provided: usize,
    },
    /// A multi-index did not supply exactly one coordinate per dimension.
    IndexArity {
        /// The tensor's rank.
        expected: usize,
        /// Number of coordinates supplied.
        got: usize,
    },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleBind { state } => write!(f, "tensor is already {state}"),
            Self::Unbound { op, state } => write!(f, "{op} called on a tensor that is {state}"),
            Self::InvalidExtent { reason } => write!(f, "invalid tensor shape: {reason}"),
            Self::InvalidAlignment { requested } => {
                write!(f, "alignment of {requested} bytes is not a power of two >= 2")
            }
            Self::AllocationFailure { bytes } => {
                write!(f, "heap allocation of {bytes} bytes for tensor failed")
            }
            Self::ForeignTooShort { required, provided } => {
                write!(
                    f,
                    "assigned buffer holds {provided} elements, shape needs {required}"
                )
            }
            Self::IndexArity { expected, got } => {
                write!(f, "expected {expected} coordinates, got {got}")
            }
        }
    }
}

impl Error for TensorError {}

impl From<ExtentError> for TensorError {
    fn from(reason: ExtentError) -> Self {
        Self::InvalidExtent { reason }
    }
}
