//! Address alignment arithmetic.
//!
//! Aligned allocation over-allocates a block and shifts the usable start
//! forward to the next multiple of the requested alignment. These helpers
//! compute that shift and measure the alignment an address actually has.

/// Alignment (in bytes) used when the caller does not specify one.
pub const DEFAULT_ALIGN: usize = 16;

/// Largest alignment reported by [`measure_alignment`].
pub const MAX_MEASURED_ALIGNMENT: usize = 512;

/// Largest power of two, capped at [`MAX_MEASURED_ALIGNMENT`], that
/// evenly divides `addr`.
///
/// This is a diagnostic measurement. The null address is divisible by
/// everything and therefore measures as the cap.
pub fn measure_alignment(addr: usize) -> usize {
    let cap = MAX_MEASURED_ALIGNMENT.trailing_zeros();
    1usize << addr.trailing_zeros().min(cap)
}

/// Whether `align` is usable as a requested byte alignment.
///
/// Accepted alignments are powers of two no smaller than 2.
pub fn is_valid_alignment(align: usize) -> bool {
    align >= 2 && align.is_power_of_two()
}

/// Smallest forward shift, in bytes, that moves `addr` onto a multiple
/// of `align`.
///
/// The result is always in `0..align`. `align` must be non-zero.
pub fn align_shift(addr: usize, align: usize) -> usize {
    debug_assert!(align > 0, "alignment must be non-zero");
    (align - addr % align) % align
}
