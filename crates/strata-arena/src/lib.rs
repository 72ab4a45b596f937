//! Linear arena allocation for blocks of numeric elements.
//!
//! An [`Arena`] owns one contiguous, fixed-capacity backing block and
//! hands out forward-advancing sub-spans of it. Spans are returned in
//! strict reverse order of checkout (stack discipline), which makes the
//! arena's bookkeeping a single cursor:
//!
//! ```text
//! Arena<T>
//! ├── Box<[T]>          (backing block, `capacity` elements, zero-init)
//! ├── navbl             (elements still free)
//! └── cursor            = capacity - navbl
//!
//! [ checked out ........ | free .............. ]
//! 0                      cursor                capacity
//! ```
//!
//! Checked-out regions are described by [`Span`]s (offset + length into
//! the backing block) rather than raw addresses. A span resolves to a
//! slice through [`Arena::slice`] / [`Arena::slice_mut`], so the borrow
//! checker ties every view to the arena's lifetime.
//!
//! Every contract violation is reported as an [`ArenaError`]; failed
//! operations leave the arena untouched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod span;

pub use arena::{Arena, ArenaInfo};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use span::Span;
