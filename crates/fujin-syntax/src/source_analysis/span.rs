// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte offsets into Fujin source text.
//!
//! Every token, syntax node and diagnostic records where it came from as a
//! [`Span`]. Spans stay as raw byte offsets; [`SourceBuffer::position`]
//! turns an offset into a line and column when a diagnostic is built.
//!
//! [`SourceBuffer::position`]: super::SourceBuffer::position

use std::cmp::{max, min};
use std::ops::Range;

/// The bytes `start..end` of a source buffer, end exclusive.
///
/// Offsets are `u32`; a single source file is limited to 4 GiB.
///
/// ```
/// use fujin_syntax::source_analysis::Span;
///
/// let callee = Span::new(4, 9);
/// let args = Span::new(9, 14);
/// assert_eq!(callee.merge(args), Span::new(4, 14));
/// assert!(!callee.contains(args));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Zero-width span used for synthesized tokens and "expected here"
    /// diagnostics.
    #[must_use]
    pub const fn empty_at(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `inner` sits inside this span. Zero-width spans at either
    /// edge count as inside.
    #[must_use]
    pub const fn contains(self, inner: Self) -> bool {
        inner.start >= self.start && inner.end <= self.end
    }

    /// The smallest span covering both, including any gap between them.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self::new(min(self.start, other.start), max(self.end, other.end))
    }

    /// Byte range for slicing the source string.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        (self.start as usize)..(self.end as usize)
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        Self::new((span.start as usize).into(), span.len() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_emptiness() {
        let word = Span::new(12, 17);
        assert_eq!((word.start(), word.end(), word.len()), (12, 17, 5));
        assert!(!word.is_empty());

        let caret = Span::empty_at(30);
        assert_eq!(caret.len(), 0);
        assert!(caret.is_empty());
    }

    #[test]
    fn merge_covers_gap_in_either_order() {
        let left = Span::new(0, 3);
        let right = Span::new(8, 11);
        assert_eq!(left.merge(right), Span::new(0, 11));
        assert_eq!(right.merge(left), left.merge(right));
        assert_eq!(left.merge(Span::new(1, 2)), left);
    }

    #[test]
    fn containment_edges() {
        let block = Span::new(10, 20);
        assert!(block.contains(block));
        assert!(block.contains(Span::empty_at(10)));
        assert!(block.contains(Span::empty_at(20)));
        assert!(!block.contains(Span::new(9, 12)));
        assert!(!block.contains(Span::new(18, 21)));
    }

    #[test]
    fn slices_source_text() {
        let source = "emit @tick;";
        assert_eq!(&source[Span::new(5, 10).as_range()], "@tick");
    }

    #[test]
    fn span_into_miette() {
        let label: miette::SourceSpan = Span::new(3, 7).into();
        assert_eq!(label.offset(), 3);
        assert_eq!(label.len(), 4);
    }
}
