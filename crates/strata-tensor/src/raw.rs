//! Low-level heap blocks and byte views for tensor buffers.
//!
//! This is the only module in the crate allowed to use `unsafe`. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;
use std::slice;

use strata_core::{align_shift, Element};

use crate::error::{ExtentError, TensorError};

/// A zero-initialised heap block holding `len` elements of `T`.
///
/// `origin` and `layout` describe the allocation exactly as it was
/// obtained from the global allocator and are the only values ever
/// passed back to it. `data` is the usable start, which may sit up to
/// `align - 1` bytes past `origin` when the block was over-allocated for
/// alignment.
pub(crate) struct RawBlock<T> {
    origin: NonNull<u8>,
    layout: Layout,
    data: NonNull<T>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Element> RawBlock<T> {
    /// Allocate `len` elements with `T`'s natural alignment.
    pub(crate) fn allocate(len: usize) -> Result<Self, TensorError> {
        let layout = Layout::array::<T>(len).map_err(|_| ExtentError::Overflow)?;
        let origin = Self::alloc_zeroed(layout)?;
        Ok(Self {
            origin,
            layout,
            data: origin.cast(),
            len,
            _marker: PhantomData,
        })
    }

    /// Allocate `len` elements whose first element sits on a multiple of
    /// `align` bytes.
    ///
    /// Requests `align + len * size_of::<T>()` bytes and shifts the usable
    /// start forward by the smallest amount that reaches the boundary.
    /// `align` must be a power of two.
    pub(crate) fn allocate_aligned(len: usize, align: usize) -> Result<Self, TensorError> {
        debug_assert!(align.is_power_of_two());
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .and_then(|b| b.checked_add(align))
            .ok_or(ExtentError::Overflow)?;
        let layout = Layout::from_size_align(bytes, mem::align_of::<T>())
            .map_err(|_| ExtentError::Overflow)?;
        let origin = Self::alloc_zeroed(layout)?;

        // `origin` is aligned for `T` and both alignments are powers of two,
        // so the shift is a multiple of `align_of::<T>()` whenever it is
        // non-zero, and `shift + len * size_of::<T>() < bytes`.
        let shift = align_shift(origin.as_ptr().addr(), align);
        // SAFETY: `shift < align <= bytes - len * size_of::<T>()`, so the
        // shifted pointer stays inside the allocation and is non-null.
        let data = unsafe { NonNull::new_unchecked(origin.as_ptr().add(shift)) }.cast::<T>();
        Ok(Self {
            origin,
            layout,
            data,
            len,
            _marker: PhantomData,
        })
    }

    fn alloc_zeroed(layout: Layout) -> Result<NonNull<u8>, TensorError> {
        // `Element` types are never zero-sized and shapes never hold zero elements.
        debug_assert!(layout.size() > 0);
        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(TensorError::AllocationFailure {
            bytes: layout.size(),
        })
    }

    /// Number of bytes the usable start sits past the allocation origin.
    pub(crate) fn shift(&self) -> usize {
        self.data.as_ptr().addr() - self.origin.as_ptr().addr()
    }

    /// Total bytes obtained from the allocator, padding included.
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.layout.size()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: `data` points to `len` zero-initialised (hence valid,
        // per `Element`) elements inside a live allocation owned by `self`.
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }
}

impl<T> Drop for RawBlock<T> {
    fn drop(&mut self) {
        // SAFETY: `origin` was returned by `alloc_zeroed` with exactly
        // `layout` and has not been freed; the shifted `data` pointer is
        // never passed here.
        unsafe { alloc::dealloc(self.origin.as_ptr(), self.layout) }
    }
}

// SAFETY: `RawBlock` uniquely owns its allocation, like `Box<[T]>`.
unsafe impl<T: Send> Send for RawBlock<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Sync> Sync for RawBlock<T> {}

/// View a slice of elements as its underlying bytes.
pub(crate) fn bytes_of<T: Element>(elems: &[T]) -> &[u8] {
    // SAFETY: `Element` types have no padding, so every byte is
    // initialised; `u8` has alignment 1 and the length covers exactly the
    // same memory.
    unsafe { slice::from_raw_parts(elems.as_ptr().cast::<u8>(), mem::size_of_val(elems)) }
}

/// View a mutable slice of elements as its underlying bytes.
pub(crate) fn bytes_of_mut<T: Element>(elems: &mut [T]) -> &mut [u8] {
    let len = mem::size_of_val(elems);
    // SAFETY: as in `bytes_of`; additionally every bit pattern is a valid
    // `Element`, so arbitrary byte writes cannot create an invalid value.
    unsafe { slice::from_raw_parts_mut(elems.as_mut_ptr().cast::<u8>(), len) }
}
