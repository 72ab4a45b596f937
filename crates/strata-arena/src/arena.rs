//! The linear arena allocator.
//!
//! [`Arena`] binds exactly one backing block for its lifetime (until an
//! explicit [`Arena::deallocate`]) and serves checkouts from a cursor
//! that only moves forward on [`Arena::checkout`] and backward on
//! [`Arena::remove`].

use std::fmt;
use std::ops::{Index, IndexMut};

use strata_core::Element;
use tracing::{debug, trace, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::span::Span;

/// Bump allocator over a single contiguous block of `T` elements.
///
/// The arena starts unallocated. After [`allocate`](Self::allocate) the
/// whole block is free; each [`checkout`](Self::checkout) reserves the
/// next elements after the cursor and each [`remove`](Self::remove) gives
/// the most recently reserved elements back. Callers must return elements
/// in reverse order of checkout. The arena does not track individual
/// checkouts, so the only ordering violation it can detect is returning
/// more than was ever handed out, which resets it to fully free.
///
/// The backing block is zero-initialised and released on drop.
pub struct Arena<T: Element = f64> {
    /// Backing block. `None` while unallocated.
    buf: Option<Box<[T]>>,
    /// Number of unconsumed elements.
    navbl: usize,
}

impl<T: Element> Arena<T> {
    /// Create an unallocated arena.
    pub fn new() -> Self {
        Self {
            buf: None,
            navbl: 0,
        }
    }

    /// Create an arena and immediately allocate `n` elements.
    pub fn with_capacity(n: usize) -> Result<Self, ArenaError> {
        let mut arena = Self::new();
        arena.allocate(n)?;
        Ok(arena)
    }

    /// Create an arena allocated according to `config`.
    pub fn with_config(config: &ArenaConfig) -> Result<Self, ArenaError> {
        Self::with_capacity(config.capacity)
    }

    /// Bind a backing block of exactly `n` elements.
    ///
    /// On success the whole block is free and the cursor is at offset 0.
    /// Fails without side effects if the arena is already allocated, if
    /// `n` is zero or too large to address, or if the heap is exhausted.
    pub fn allocate(&mut self, n: usize) -> Result<(), ArenaError> {
        if let Some(buf) = &self.buf {
            return Err(ArenaError::DoubleBind {
                capacity: buf.len(),
            });
        }
        let config = ArenaConfig::new(n);
        config.validate::<T>()?;

        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| ArenaError::AllocationFailure { elements: n })?;
        data.resize(n, T::default());

        self.buf = Some(data.into_boxed_slice());
        self.navbl = n;
        debug!(
            capacity = n,
            bytes = config.block_bytes::<T>(),
            element = T::NAME,
            "arena allocated"
        );
        Ok(())
    }

    /// Release the backing block.
    ///
    /// Every outstanding [`Span`] becomes meaningless; resolving one
    /// afterwards yields `None`.
    pub fn deallocate(&mut self) -> Result<(), ArenaError> {
        let buf = self
            .buf
            .take()
            .ok_or(ArenaError::Unbound { op: "deallocate" })?;
        self.navbl = 0;
        debug!(capacity = buf.len(), element = T::NAME, "arena deallocated");
        Ok(())
    }

    /// Reserve the next `n` elements after the cursor.
    ///
    /// Returns the reserved region; its [`offset`](Span::offset) is the
    /// cursor before the call and its [`end`](Span::end) is the cursor
    /// after it. `n == 0` yields an empty span and leaves the arena as is.
    pub fn checkout(&mut self, n: usize) -> Result<Span, ArenaError> {
        if self.buf.is_none() {
            return Err(ArenaError::Unbound { op: "checkout" });
        }
        if n > self.navbl {
            return Err(ArenaError::OverCheckout {
                requested: n,
                available: self.navbl,
            });
        }
        let span = Span::new(self.cursor(), n);
        self.navbl -= n;
        trace!(
            offset = span.offset(),
            len = n,
            nfree = self.navbl,
            "arena checkout"
        );
        Ok(span)
    }

    /// Return the `n` most recently checked-out elements.
    ///
    /// Moves the cursor back by `n` and returns its new offset. If the
    /// free count would exceed the capacity, the arena is reset to fully
    /// free (cursor 0) instead.
    pub fn remove(&mut self, n: usize) -> Result<usize, ArenaError> {
        let capacity = match &self.buf {
            Some(buf) => buf.len(),
            None => return Err(ArenaError::Unbound { op: "remove" }),
        };
        match self.navbl.checked_add(n) {
            Some(navbl) if navbl <= capacity => {
                self.navbl = navbl;
                trace!(len = n, nfree = self.navbl, "arena remove");
            }
            _ => {
                warn!(
                    returned = n,
                    outstanding = capacity - self.navbl,
                    "arena remove exceeds outstanding checkouts; resetting to fully free"
                );
                self.navbl = capacity;
            }
        }
        Ok(self.cursor())
    }

    /// Whether a backing block is bound.
    pub fn is_allocated(&self) -> bool {
        self.buf.is_some()
    }

    /// Total element capacity. 0 while unallocated.
    pub fn size(&self) -> usize {
        self.buf.as_ref().map_or(0, |buf| buf.len())
    }

    /// Number of elements not currently checked out.
    pub fn nfree(&self) -> usize {
        self.navbl
    }

    /// Number of elements currently checked out.
    pub fn used(&self) -> usize {
        self.size() - self.navbl
    }

    /// Offset of the first unconsumed element.
    pub fn cursor(&self) -> usize {
        self.used()
    }

    /// Element at absolute offset `i` from the start of the block.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.buf.as_ref()?.get(i)
    }

    /// Mutable element at absolute offset `i` from the start of the block.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.buf.as_mut()?.get_mut(i)
    }

    /// The whole backing block, checked out or not. Empty while unallocated.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_deref().unwrap_or(&[])
    }

    /// Mutable view of the whole backing block. Empty while unallocated.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }

    /// Resolve `span` against the backing block.
    ///
    /// Returns `None` if the arena is unallocated or the span reaches past
    /// the capacity.
    pub fn slice(&self, span: Span) -> Option<&[T]> {
        self.buf.as_ref()?.get(span.range())
    }

    /// Resolve `span` against the backing block, mutably.
    pub fn slice_mut(&mut self, span: Span) -> Option<&mut [T]> {
        self.buf.as_mut()?.get_mut(span.range())
    }

    /// Resolve several pairwise-disjoint spans at once.
    ///
    /// Returns `None` if the arena is unallocated, any span reaches past
    /// the capacity, or two spans overlap.
    pub fn disjoint_mut<const N: usize>(
        &mut self,
        spans: [Span; N],
    ) -> Option<[&mut [T]; N]> {
        let buf = self.buf.as_mut()?;
        buf.get_disjoint_mut(spans.map(|s| s.range())).ok()
    }

    /// Snapshot of the arena's bookkeeping.
    pub fn info(&self) -> ArenaInfo {
        ArenaInfo {
            allocated: self.is_allocated(),
            capacity: self.size(),
            nfree: self.navbl,
            cursor: self.cursor(),
            element: T::NAME,
            element_bytes: std::mem::size_of::<T>(),
        }
    }
}

impl<T: Element> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("element", &T::NAME)
            .field("allocated", &self.is_allocated())
            .field("capacity", &self.size())
            .field("nfree", &self.navbl)
            .finish()
    }
}

impl<T: Element> Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        match self.buf.as_ref() {
            Some(buf) => &buf[i],
            None => panic!("index {i} into an unallocated arena"),
        }
    }
}

impl<T: Element> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        match self.buf.as_mut() {
            Some(buf) => &mut buf[i],
            None => panic!("index {i} into an unallocated arena"),
        }
    }
}

/// Point-in-time summary of an arena, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaInfo {
    /// Whether a backing block is bound.
    pub allocated: bool,
    /// Total element capacity.
    pub capacity: usize,
    /// Elements not checked out.
    pub nfree: usize,
    /// Offset of the first unconsumed element.
    pub cursor: usize,
    /// Element type name.
    pub element: &'static str,
    /// Size of one element in bytes.
    pub element_bytes: usize,
}

impl ArenaInfo {
    /// Size of the backing block in bytes.
    pub fn block_bytes(&self) -> usize {
        self.capacity * self.element_bytes
    }
}

impl fmt::Display for ArenaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.allocated {
            return write!(f, "arena<{}> is not allocated", self.element);
        }
        write!(
            f,
            "arena<{}>: {} elements ({} bytes), {} free, next element at offset {}",
            self.element,
            self.capacity,
            self.block_bytes(),
            self.nfree,
            self.cursor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_unallocated() {
        let arena = Arena::<f64>::new();
        assert!(!arena.is_allocated());
        assert_eq!(arena.size(), 0);
        assert_eq!(arena.nfree(), 0);
        assert!(arena.as_slice().is_empty());
    }

    #[test]
    fn allocate_sets_capacity_and_free() {
        let mut arena = Arena::<f64>::new();
        arena.allocate(10).unwrap();
        assert!(arena.is_allocated());
        assert_eq!(arena.size(), 10);
        assert_eq!(arena.nfree(), 10);
        assert_eq!(arena.cursor(), 0);
        assert!(arena.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn double_allocate_is_rejected_and_keeps_state() {
        let mut arena = Arena::<f64>::with_capacity(8).unwrap();
        arena.checkout(3).unwrap();
        assert_eq!(
            arena.allocate(4),
            Err(ArenaError::DoubleBind { capacity: 8 })
        );
        assert_eq!(arena.size(), 8);
        assert_eq!(arena.nfree(), 5);
    }

    #[test]
    fn allocate_zero_is_invalid() {
        let mut arena = Arena::<f64>::new();
        assert_eq!(
            arena.allocate(0),
            Err(ArenaError::InvalidExtent { requested: 0 })
        );
        assert!(!arena.is_allocated());
    }

    #[test]
    fn allocate_unaddressable_is_invalid() {
        let mut arena = Arena::<f64>::new();
        assert!(matches!(
            arena.allocate(usize::MAX),
            Err(ArenaError::InvalidExtent { .. })
        ));
        assert!(!arena.is_allocated());
    }

    #[test]
    fn deallocate_requires_allocation() {
        let mut arena = Arena::<f32>::new();
        assert_eq!(
            arena.deallocate(),
            Err(ArenaError::Unbound { op: "deallocate" })
        );
    }

    #[test]
    fn deallocate_then_reallocate() {
        let mut arena = Arena::<f64>::with_capacity(4).unwrap();
        arena.checkout(2).unwrap();
        arena.deallocate().unwrap();
        assert!(!arena.is_allocated());
        assert_eq!(arena.size(), 0);
        assert_eq!(arena.nfree(), 0);

        arena.allocate(6).unwrap();
        assert_eq!(arena.size(), 6);
        assert_eq!(arena.nfree(), 6);
        assert_eq!(arena.cursor(), 0);
    }

    #[test]
    fn checkout_returns_start_of_region() {
        let mut arena = Arena::<f64>::with_capacity(10).unwrap();
        let a = arena.checkout(4).unwrap();
        let b = arena.checkout(3).unwrap();
        assert_eq!(a, Span::new(0, 4));
        assert_eq!(b, Span::new(4, 3));
        assert_eq!(b.end(), arena.cursor());
        assert_eq!(arena.nfree(), 3);
    }

    #[test]
    fn checkout_and_remove_are_lifo() {
        let mut arena = Arena::<f64>::with_capacity(10).unwrap();
        arena.checkout(4).unwrap();
        arena.checkout(3).unwrap();
        assert_eq!(arena.nfree(), 3);

        assert_eq!(arena.remove(3).unwrap(), 4);
        assert_eq!(arena.remove(4).unwrap(), 0);
        assert_eq!(arena.nfree(), 10);
    }

    #[test]
    fn checkout_entire_capacity() {
        let mut arena = Arena::<f64>::with_capacity(5).unwrap();
        let s = arena.checkout(5).unwrap();
        assert_eq!(s, Span::new(0, 5));
        assert_eq!(arena.nfree(), 0);
        assert!(arena.checkout(0).unwrap().is_empty());
    }

    #[test]
    fn over_checkout_is_rejected_without_effect() {
        let mut arena = Arena::<f64>::with_capacity(10).unwrap();
        arena.checkout(7).unwrap();
        assert_eq!(
            arena.checkout(4),
            Err(ArenaError::OverCheckout {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(arena.nfree(), 3);
        assert_eq!(arena.cursor(), 7);
    }

    #[test]
    fn checkout_and_remove_require_allocation() {
        let mut arena = Arena::<f64>::new();
        assert_eq!(arena.checkout(1), Err(ArenaError::Unbound { op: "checkout" }));
        assert_eq!(arena.remove(1), Err(ArenaError::Unbound { op: "remove" }));
    }

    #[test]
    fn over_return_clamps_to_fully_free() {
        let mut arena = Arena::<f64>::with_capacity(10).unwrap();
        arena.checkout(6).unwrap();
        assert_eq!(arena.remove(7).unwrap(), 0);
        assert_eq!(arena.nfree(), 10);
        assert_eq!(arena.cursor(), 0);
    }

    #[test]
    fn over_return_near_usize_max_clamps() {
        let mut arena = Arena::<f64>::with_capacity(3).unwrap();
        assert_eq!(arena.remove(usize::MAX).unwrap(), 0);
        assert_eq!(arena.nfree(), 3);
    }

    #[test]
    fn spans_resolve_to_slices() {
        let mut arena = Arena::<f64>::with_capacity(8).unwrap();
        let a = arena.checkout(3).unwrap();
        let b = arena.checkout(2).unwrap();
        arena.slice_mut(a).unwrap().fill(1.0);
        arena.slice_mut(b).unwrap().fill(2.0);

        assert_eq!(arena.slice(a).unwrap(), &[1.0, 1.0, 1.0]);
        assert_eq!(arena.slice(b).unwrap(), &[2.0, 2.0]);
        assert_eq!(arena[3], 2.0);
        assert_eq!(arena[5], 0.0);
    }

    #[test]
    fn span_past_capacity_does_not_resolve() {
        let mut arena = Arena::<f64>::with_capacity(4).unwrap();
        assert!(arena.slice(Span::new(2, 3)).is_none());
        arena.deallocate().unwrap();
        assert!(arena.slice(Span::new(0, 1)).is_none());
    }

    #[test]
    fn disjoint_spans_borrow_together() {
        let mut arena = Arena::<f32>::with_capacity(6).unwrap();
        let a = arena.checkout(2).unwrap();
        let b = arena.checkout(4).unwrap();
        let [x, y] = arena.disjoint_mut([a, b]).unwrap();
        x.fill(1.0);
        y.fill(2.0);
        assert_eq!(arena.as_slice(), &[1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn overlapping_spans_are_refused() {
        let mut arena = Arena::<f32>::with_capacity(6).unwrap();
        assert!(arena
            .disjoint_mut([Span::new(0, 3), Span::new(2, 2)])
            .is_none());
    }

    #[test]
    fn index_by_absolute_offset() {
        let mut arena = Arena::<i32>::with_capacity(4).unwrap();
        arena[2] = 7;
        *arena.get_mut(3).unwrap() = 9;
        assert_eq!(arena.get(2), Some(&7));
        assert_eq!(arena[3], 9);
        assert_eq!(arena.get(4), None);
    }

    #[test]
    #[should_panic(expected = "unallocated arena")]
    fn index_unallocated_panics() {
        let arena = Arena::<f64>::new();
        let _ = arena[0];
    }

    #[test]
    fn info_reports_bookkeeping() {
        let mut arena = Arena::<f64>::with_capacity(10).unwrap();
        arena.checkout(4).unwrap();
        let info = arena.info();
        assert!(info.allocated);
        assert_eq!(info.capacity, 10);
        assert_eq!(info.nfree, 6);
        assert_eq!(info.cursor, 4);
        assert_eq!(info.block_bytes(), 80);
        assert_eq!(
            info.to_string(),
            "arena<f64>: 10 elements (80 bytes), 6 free, next element at offset 4"
        );
    }

    #[test]
    fn info_unallocated() {
        let arena = Arena::<f32>::new();
        assert_eq!(arena.info().to_string(), "arena<f32> is not allocated");
    }

    #[test]
    fn with_config_uses_capacity() {
        let config = ArenaConfig::new(32);
        let arena = Arena::<f64>::with_config(&config).unwrap();
        assert_eq!(arena.size(), 32);
        assert_eq!(arena.info().block_bytes(), config.block_bytes::<f64>());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn checkout_then_remove_restores_state(
                cap in 1usize..512,
                pre in 0usize..512,
                k in 0usize..512,
            ) {
                let mut arena = Arena::<f64>::with_capacity(cap).unwrap();
                let pre = pre.min(cap);
                arena.checkout(pre).unwrap();
                let k = k.min(arena.nfree());

                let (free_before, cursor_before) = (arena.nfree(), arena.cursor());
                let span = arena.checkout(k).unwrap();
                prop_assert_eq!(span.offset(), cursor_before);
                prop_assert_eq!(arena.nfree(), free_before - k);

                arena.remove(k).unwrap();
                prop_assert_eq!(arena.nfree(), free_before);
                prop_assert_eq!(arena.cursor(), cursor_before);
            }

            #[test]
            fn lifo_sequence_returns_to_empty(
                cap in 1usize..1024,
                sizes in proptest::collection::vec(0usize..64, 0..16),
            ) {
                let mut arena = Arena::<f32>::with_capacity(cap).unwrap();
                let mut taken = Vec::new();
                for n in sizes {
                    if let Ok(span) = arena.checkout(n) {
                        taken.push(span);
                    }
                }
                let outstanding: usize = taken.iter().map(|s| s.len()).sum();
                prop_assert_eq!(arena.nfree() + outstanding, cap);
                while let Some(span) = taken.pop() {
                    prop_assert_eq!(arena.remove(span.len()).unwrap(), span.offset());
                }
                prop_assert_eq!(arena.nfree(), cap);
            }

            #[test]
            fn free_count_never_exceeds_capacity(
                cap in 1usize..256,
                ops in proptest::collection::vec((any::<bool>(), 0usize..300), 0..32),
            ) {
                let mut arena = Arena::<f64>::with_capacity(cap).unwrap();
                for (is_checkout, n) in ops {
                    if is_checkout {
                        let _ = arena.checkout(n);
                    } else {
                        arena.remove(n).unwrap();
                    }
                    prop_assert!(arena.nfree() <= arena.size());
                    prop_assert_eq!(arena.cursor() + arena.nfree(), cap);
                }
            }
        }
    }
}
