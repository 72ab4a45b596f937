//! Benchmark profiles and utilities for the Strata memory substrate.
//!
//! - [`KERNEL_SHAPES`]: tensor shapes representative of numeric kernels
//! - [`scratch_arena`]: an arena sized to hold every kernel shape at once
//! - [`fill_ramp`]: deterministic buffer contents

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_arena::{Arena, ArenaError};
use strata_tensor::Tensor;

/// Shapes used by the tensor benchmarks, smallest first.
pub const KERNEL_SHAPES: &[&[usize]] = &[&[64], &[32, 32], &[16, 16, 16], &[8, 8, 8, 8]];

/// Total elements across all [`KERNEL_SHAPES`].
pub fn kernel_elements() -> usize {
    KERNEL_SHAPES
        .iter()
        .map(|dims| dims.iter().product::<usize>())
        .sum()
}

/// An arena large enough to hold one view of every kernel shape.
pub fn scratch_arena() -> Result<Arena<f64>, ArenaError> {
    Arena::with_capacity(kernel_elements())
}

/// Write `0, 1, 2, ...` into every element of `t`.
pub fn fill_ramp(t: &mut Tensor<'_, f64>) {
    for (i, v) in t.as_mut_slice().iter_mut().enumerate() {
        *v = i as f64;
    }
}
