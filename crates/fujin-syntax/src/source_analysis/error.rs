// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical error types.
//!
//! The scanner never stops on bad input. It records a [`LexError`] next to
//! the token it produced and keeps going; the parser turns these into
//! [`Diagnostic`](super::Diagnostic)s as tokens are consumed.

// miette's derive expands to assignments rustc flags as unused.
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A lexical error encountered during scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic(code(fujin::lex))]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// Where the problem is. For unterminated constructs this is the
    /// opening delimiter.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A character no token can start with.
    #[must_use]
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::new(LexErrorKind::UnexpectedCharacter(c), span)
    }

    /// Returns true if scanning gave up on the rest of the input.
    #[must_use]
    pub const fn is_unterminated(&self) -> bool {
        matches!(
            self.kind,
            LexErrorKind::UnterminatedString
                | LexErrorKind::UnterminatedTemplate
                | LexErrorKind::UnterminatedComment
                | LexErrorKind::UnterminatedRegex
        )
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// A string literal reached a line end or end of input.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A template literal reached end of input.
    #[error("unterminated template literal")]
    UnterminatedTemplate,

    /// A block comment reached end of input.
    #[error("unterminated block comment")]
    UnterminatedComment,

    /// A regex literal reached a line end or end of input.
    #[error("unterminated regular expression")]
    UnterminatedRegex,

    /// A malformed escape such as `\x4` or `\u{}`.
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),

    /// A malformed numeric literal such as `0x`, `1__0` or `3in`.
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::unexpected_char('§', Span::new(0, 2));
        assert_eq!(err.to_string(), "unexpected character '§'");

        let err = LexError::new(LexErrorKind::UnterminatedString, Span::new(8, 9));
        assert_eq!(err.to_string(), "unterminated string literal");
        assert!(err.is_unterminated());
    }

    #[test]
    fn invalid_escape_quotes_source() {
        let err = LexError::new(LexErrorKind::InvalidEscape("\\x4".into()), Span::new(1, 4));
        assert_eq!(err.to_string(), "invalid escape sequence `\\x4`");
        assert!(!err.is_unterminated());
    }
}
