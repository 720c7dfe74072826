//! Byte-offset span types for locating tokens inside a document buffer.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

/// A byte-offset range within a document buffer.
///
/// Convertible to a [`Range<usize>`](std::ops::Range) for slicing.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new [`Span`] from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates an empty [`Span`] positioned at `at`.
    #[inline]
    pub fn empty_at(at: u32) -> Self {
        Self { start: at, end: at }
    }

    /// Number of bytes covered.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the span moved by a signed byte offset.
    ///
    /// Used when reading positions from a token cache that predates earlier
    /// splices made in the same edit.
    #[inline]
    pub fn shifted(self, delta: i64) -> Self {
        Self {
            start: (self.start as i64 + delta) as u32,
            end: (self.end as i64 + delta) as u32,
        }
    }

    /// Slices `text` with this span.
    #[inline]
    pub fn slice(self, text: &str) -> &str {
        &text[self.start as usize..self.end as usize]
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(s: Span) -> Self {
        s.start as usize..s.end as usize
    }
}
