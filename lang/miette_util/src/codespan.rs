use std::fmt;
use std::ops::Range;

/// The raw, untyped index. We use a 32-bit integer here for space efficiency,
/// assuming we won't be working with sources larger than 4GB.
pub type RawIndex = u32;

/// A byte position in a source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ByteIndex(pub RawIndex);

impl ByteIndex {
    /// Convert the position into a `usize`, for use in array indexing
    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ByteIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ByteIndex(")?;
        self.0.fmt(f)?;
        write!(f, ")")
    }
}

impl fmt::Display for ByteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<RawIndex> for ByteIndex {
    fn from(index: RawIndex) -> ByteIndex {
        ByteIndex(index)
    }
}

impl From<usize> for ByteIndex {
    fn from(index: usize) -> ByteIndex {
        ByteIndex(index as RawIndex)
    }
}

impl From<ByteIndex> for usize {
    fn from(index: ByteIndex) -> usize {
        index.to_usize()
    }
}

/// A half-open byte range `[start, end)` in a source file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    start: ByteIndex,
    end: ByteIndex,
}

impl Span {
    /// Create a new span from a starting and ending span.
    pub fn new(start: impl Into<ByteIndex>, end: impl Into<ByteIndex>) -> Span {
        let start = start.into();
        let end = end.into();

        debug_assert!(end >= start);

        Span { start, end }
    }

    /// Gives an empty span at the start of a source.
    pub const fn initial() -> Span {
        Span { start: ByteIndex(0), end: ByteIndex(0) }
    }

    /// Combine two spans by taking the start of the earlier span
    /// and the end of the later span.
    ///
    /// ```rust
    /// use turbox_lang_miette_util::codespan::Span;
    ///
    /// let span1 = Span::new(0u32, 4u32);
    /// let span2 = Span::new(10u32, 16u32);
    ///
    /// assert_eq!(Span::merge(span1, span2), Span::new(0u32, 16u32));
    /// ```
    pub fn merge(self, other: Span) -> Span {
        use std::cmp::{max, min};

        let start = min(self.start, other.start);
        let end = max(self.end, other.end);
        Span::new(start, end)
    }

    /// Shift a span that was computed relative to a substring so that it is relative
    /// to the enclosing source again.
    pub fn offset_by(self, base: ByteIndex) -> Span {
        Span { start: ByteIndex(self.start.0 + base.0), end: ByteIndex(self.end.0 + base.0) }
    }

    pub fn start(self) -> ByteIndex {
        self.start
    }

    pub fn end(self) -> ByteIndex {
        self.end
    }

    pub fn len(self) -> usize {
        self.end.to_usize() - self.start.to_usize()
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl Default for Span {
    fn default() -> Span {
        Span::initial()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{start}, {end})", start = self.start(), end = self.end(),)
    }
}

impl<I> From<Range<I>> for Span
where
    I: Into<ByteIndex>,
{
    fn from(range: Range<I>) -> Span {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Range<usize> {
        span.start.into()..span.end.into()
    }
}

#[cfg(test)]
mod test {
    use super::{ByteIndex, Span};

    #[test]
    fn test_merge() {
        // overlap
        let a = Span::from(1usize..5);
        let b = Span::from(3usize..10);
        assert_eq!(a.merge(b), Span::from(1usize..10));
        assert_eq!(b.merge(a), Span::from(1usize..10));

        // disjoint
        let ten_twenty = Span::from(10usize..20);
        assert_eq!(a.merge(ten_twenty), Span::from(1usize..20));

        // identity
        assert_eq!(a.merge(a), a);
    }

    #[test]
    fn test_offset_by() {
        let inner = Span::from(2usize..5);
        assert_eq!(inner.offset_by(ByteIndex(10)), Span::from(12usize..15));
        assert_eq!(inner.len(), 3);
    }
}
