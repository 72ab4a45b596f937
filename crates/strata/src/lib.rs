//! Strata: a numeric memory substrate for scientific kernels.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Strata sub-crates. It provides two independent components with
//! explicit, checked ownership of raw numeric buffers:
//!
//! - a linear [`Arena`](arena::Arena) that hands out stack-disciplined
//!   spans of one pre-sized block, and
//! - a column-major strided [`Tensor`](tensor::Tensor) that owns an
//!   (optionally aligned) allocation or borrows caller memory.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Scratch space for a kernel.
//! let mut arena = Arena::<f64>::with_capacity(64).unwrap();
//! let span = arena.checkout(24).unwrap();
//!
//! // A 2x3x4 view over the checked-out span.
//! {
//!     let mut view = Tensor::assigned(arena.slice_mut(span).unwrap(), &[2, 3, 4]).unwrap();
//!     view[[1, 2, 3]] = 1.5;
//! }
//! assert_eq!(arena[span.offset() + 23], 1.5);
//!
//! // Give the scratch space back.
//! arena.remove(span.len()).unwrap();
//! assert_eq!(arena.nfree(), 64);
//!
//! // An owned, 64-byte aligned tensor.
//! let t = Tensor::<f32>::aligned(64, &[16, 16]).unwrap();
//! assert_eq!(t.as_slice().as_ptr() as usize % 64, 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `strata-arena` | `Arena`, `Span`, `ArenaConfig`, `ArenaError` |
//! | [`tensor`] | `strata-tensor` | `Tensor`, `Shape`, `Ownership`, `same_shape`, `TensorError` |
//! | [`types`] | `strata-core` | `Element`, alignment helpers and constants |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Linear arena allocation (`strata-arena`).
///
/// [`arena::Arena`] owns one fixed-capacity block; [`arena::Span`]s
/// describe regions checked out of it.
pub use strata_arena as arena;

/// Strided tensors (`strata-tensor`).
///
/// [`tensor::Tensor`] with its Unset/Owned/Borrowed state machine and
/// the [`tensor::same_shape`] comparison.
pub use strata_tensor as tensor;

/// Element types and alignment arithmetic (`strata-core`).
pub use strata_core as types;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use strata_arena::{Arena, ArenaConfig, ArenaError, Span};

    // Tensor
    pub use strata_tensor::{same_shape, Ownership, Shape, Tensor, TensorError};

    // Core
    pub use strata_core::{Element, DEFAULT_ALIGN};
}
