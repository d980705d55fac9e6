//! Byte spans into module text.

use std::fmt;
use std::ops::Range;
use text_size::TextSize;

/// Offset in bytes from the start of a module.
pub type ByteOffset = TextSize;

/// A half-open `[start, end)` byte range into the text of one module.
///
/// Displays as `[start,end)`, which is also the textual tag used to name
/// placeholders after their call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// First byte covered.
    pub start: ByteOffset,
    /// One past the last byte covered.
    pub end: ByteOffset,
}

impl Span {
    /// Creates `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `start > end`.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        let (start, end) = (start.into(), end.into());
        debug_assert!(start <= end, "span start {start:?} is after end {end:?}");
        Self { start, end }
    }

    /// A zero-length span, as used by insertions.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely inside this span; equal spans count.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the span as a `usize` range, suitable for slicing the source.
    #[inline]
    pub fn range(self) -> Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", u32::from(self.start), u32::from(self.end))
    }
}
