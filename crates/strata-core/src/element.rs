//! The [`Element`] marker trait for numeric buffer contents.

use std::fmt::Debug;

mod sealed {
    pub trait Sealed {}
}

/// A plain numeric type that may live in an arena or tensor buffer.
///
/// Every implementor is a primitive integer or float: it has no padding,
/// no drop glue, a non-zero size, and every bit pattern (all-zero
/// included) is a valid value. Buffers are zero-initialised on
/// acquisition and may be reinterpreted as raw bytes for bulk I/O, both
/// of which rely on these properties. The trait is sealed so that the
/// set of implementors cannot grow outside this crate.
pub trait Element: sealed::Sealed + Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Short type name used in diagnostics (e.g. `"f64"`).
    const NAME: &'static str;
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

impl_element!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
