//! Source span and position tracking for URI expression parsing
//!
//! Query option text is a single line, so locations are byte positions
//! rather than line/column pairs. Positions are 0-based.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A span in the expression text, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span from start and end offsets
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a position
    #[inline]
    pub const fn point(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Create a span covering a single byte
    #[inline]
    pub const fn single(pos: usize) -> Self {
        Self { start: pos, end: pos + 1 }
    }

    /// Get the length of the span in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Merge two spans into one that covers both
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Check if this span contains a position
    #[inline]
    pub const fn contains_pos(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Convert to a range
    #[inline]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Location of an offending token within the expression text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Byte position from the start of the text (0-based)
    pub position: usize,
    /// Length in bytes
    pub length: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub const fn new(position: usize, length: usize) -> Self {
        Self { position, length }
    }

    /// Create a point location with length 1
    pub const fn point(position: usize) -> Self {
        Self::new(position, 1)
    }

    /// Create from a span
    pub const fn from_span(span: Span) -> Self {
        Self {
            position: span.start,
            length: span.len(),
        }
    }

    /// Get the span for this location
    pub const fn span(&self) -> Span {
        Span::new(self.position, self.position + self.length)
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {}", self.position)
    }
}
