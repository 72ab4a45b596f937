//! Arena configuration parameters.

use std::mem;

use strata_core::Element;

use crate::error::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated when the arena is allocated from it; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of elements in the backing block.
    ///
    /// Must be at least 1, and the block's byte size must fit in `isize`.
    pub capacity: usize,
}

impl ArenaConfig {
    /// Create a new arena config for the given element capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check that an arena of element type `T` can be built from this config.
    pub fn validate<T: Element>(&self) -> Result<(), ArenaError> {
        let invalid = ArenaError::InvalidExtent {
            requested: self.capacity,
        };
        if self.capacity == 0 {
            return Err(invalid);
        }
        match self.capacity.checked_mul(mem::size_of::<T>()) {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(invalid),
        }
    }

    /// Size of the backing block in bytes for element type `T`.
    ///
    /// Saturates at `usize::MAX` for configs that would not validate.
    pub fn block_bytes<T: Element>(&self) -> usize {
        self.capacity.saturating_mul(mem::size_of::<T>())
    }
}
