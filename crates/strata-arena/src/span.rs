//! Checked-out regions of an arena.

use std::fmt;
use std::ops::Range;

/// A contiguous region of an arena's backing block.
///
/// `offset` is the first element of the region, measured from the start
/// of the block; `end()` is the arena cursor immediately after the region
/// was checked out. Spans are plain values: they do not borrow the arena,
/// and are resolved to slices with [`Arena::slice`](crate::Arena::slice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    offset: usize,
    len: usize,
}

impl Span {
    /// Create a span covering `len` elements starting at `offset`.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// First element of the region.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of elements in the region.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last element of the region.
    ///
    /// Saturates, so a span that cannot exist never resolves.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }

    /// The region as an index range into the backing block.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.offset, self.end())
    }
}
