// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Immutable source text with line/column lookup.

use std::fmt;
use std::sync::Arc;

use ecow::EcoString;

use super::Span;

/// A resolved source location.
///
/// `line` and `column` are 1-based; `column` counts Unicode scalar values.
/// `offset` is the 0-based byte offset the position was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
    /// 0-based byte offset.
    pub offset: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Returns true for the characters that end a line.
#[must_use]
pub const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// An immutable, cheaply cloneable source file.
///
/// The text is shared behind an [`Arc`], so a buffer can be handed to
/// several threads and each can run its own parse.
///
/// # Examples
///
/// ```
/// use fujin_syntax::source_analysis::SourceBuffer;
///
/// let source = SourceBuffer::named("main.fj", "let a = 1\nlet é = 2");
/// let pos = source.position(14);
/// assert_eq!((pos.line, pos.column), (2, 5));
/// ```
#[derive(Clone)]
pub struct SourceBuffer {
    name: EcoString,
    text: Arc<str>,
    line_starts: Arc<[u32]>,
}

impl fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("name", &self.name)
            .field("len", &self.text.len())
            .field("lines", &self.line_starts.len())
            .finish()
    }
}

impl SourceBuffer {
    /// Creates an anonymous buffer.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self::named("<input>", text)
    }

    /// Creates a buffer with a display name used in rendered diagnostics.
    #[must_use]
    pub fn named(name: impl Into<EcoString>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text).into();
        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    /// The display name of this buffer.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The byte at `offset`, if any.
    #[must_use]
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(offset).copied()
    }

    /// The character starting at `offset`, or `None` when `offset` is past
    /// the end or not on a character boundary.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(offset..)?.chars().next()
    }

    /// The text covered by `span`, or `""` if the span does not fall on
    /// character boundaries inside the buffer.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.as_range()).unwrap_or("")
    }

    /// Resolves a byte offset into a line/column position.
    ///
    /// Offsets past the end clamp to the end of the buffer; offsets inside a
    /// multi-byte character resolve to that character's column.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    pub fn position(&self, offset: u32) -> Position {
        let offset = (offset as usize).min(self.text.len());
        let line_index = match self.line_starts.binary_search(&(offset as u32)) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line_index).copied().unwrap_or(0) as usize;
        let column = self
            .text
            .get(line_start..)
            .unwrap_or("")
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .count();
        Position {
            line: line_index as u32 + 1,
            column: column as u32 + 1,
            offset: offset as u32,
        }
    }

    /// Resolves both ends of a span.
    #[must_use]
    pub fn positions(&self, span: Span) -> (Position, Position) {
        (self.position(span.start()), self.position(span.end()))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "source files over 4GB are not supported"
)]
fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            continue;
        }
        if is_line_terminator(c) {
            starts.push((i + c.len_utf8()) as u32);
        }
    }
    starts
}
