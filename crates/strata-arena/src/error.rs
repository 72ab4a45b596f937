//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// `allocate` was called on an arena that already owns a backing block.
    DoubleBind {
        /// Capacity of the block already bound.
        capacity: usize,
    },
    /// An operation that needs a backing block was called on an
    /// unallocated arena.
    Unbound {
        /// Name of the rejected operation.
        op: &'static str,
    },
    /// The requested element count is zero or exceeds what the platform
    /// can address.
    InvalidExtent {
        /// Number of elements requested.
        requested: usize,
    },
    /// `checkout` asked for more elements than are currently free.
    OverCheckout {
        /// Number of elements requested.
        requested: usize,
        /// Number of elements free at the time of the request.
        available: usize,
    },
    /// The heap could not provide the backing block.
    AllocationFailure {
        /// Number of elements that could not be allocated.
        elements: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoubleBind { capacity } => {
                write!(f, "arena already allocated with {capacity} elements")
            }
            Self::Unbound { op } => write!(f, "{op} called on an unallocated arena"),
            Self::InvalidExtent { requested } => {
                write!(f, "invalid arena extent: {requested} elements")
            }
            Self::OverCheckout {
                requested,
                available,
            } => {
                write!(
                    f,
                    "checkout of {requested} elements exceeds {available} free elements"
                )
            }
            Self::AllocationFailure { elements } => {
                write!(f, "heap allocation of {elements} arena elements failed")
            }
        }
    }
}

impl Error for ArenaError {}
