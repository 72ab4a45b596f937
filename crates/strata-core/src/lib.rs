//! Core types for the Strata numeric memory substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces shared by the arena and the strided tensor: the [`Element`]
//! marker trait for plain numeric element types, and the address
//! alignment arithmetic used by aligned allocation and its diagnostics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod element;

pub use align::{
    align_shift, is_valid_alignment, measure_alignment, DEFAULT_ALIGN, MAX_MEASURED_ALIGNMENT,
};
pub use element::Element;
