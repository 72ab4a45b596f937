//! Fixed-shape, column-major strided tensors.
//!
//! A [`Tensor`] is a multi-dimensional view over a flat buffer of
//! [`Element`](strata_core::Element)s. Its shape is fixed when it is
//! bound and its strides are column-major: the first dimension has
//! stride 1 and each later stride is the product of all earlier lengths.
//!
//! # Ownership
//!
//! A tensor is always in exactly one of three states:
//!
//! ```text
//!            allocate / aligned_allocate              assign
//!   Owned  <─────────────────────────────  Unset  ─────────────>  Borrowed
//!          ─────────────────────────────>        <─────────────
//!                     deallocate                     unassign
//! ```
//!
//! - **Unset:** no buffer, blank shape.
//! - **Owned:** the tensor allocated its buffer and releases it on
//!   `deallocate` or drop. Aligned allocations keep the raw allocation
//!   origin separately from the (possibly shifted) usable start.
//! - **Borrowed:** a view over caller memory (for example a span checked
//!   out of a `strata-arena` arena). The borrow checker keeps the memory
//!   alive for as long as the view; the tensor never frees it.
//!
//! Binding from a non-Unset state, or unbinding with the call that does
//! not match the current state, returns a [`TensorError`] and leaves the
//! tensor unchanged.
//!
//! # Safety
//!
//! All `unsafe` code lives in the private `raw` module, which owns the
//! aligned heap block and the byte reinterpretation used for bulk I/O.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
mod raw;
pub mod shape;
pub mod tensor;

pub use error::{ExtentError, TensorError};
pub use shape::Shape;
pub use tensor::{same_shape, Ownership, Tensor};
