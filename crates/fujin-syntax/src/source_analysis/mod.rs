// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Fujin source code.
//!
//! This module contains the source buffer, scanner, token stream, parser and
//! diagnostics. The AST lives in [`crate::ast`].
//!
//! # Lexical Analysis
//!
//! The [`Scanner`] converts source text into [`Token`]s one at a time, under
//! a [`LexGoal`] chosen by the parser: ordinary code, FJX text, FJX tags, or
//! type arguments (where `>>` splits). Each token carries its [`Span`],
//! resolved [`Position`]s and leading [`Trivia`].
//!
//! ```
//! use fujin_syntax::source_analysis::{lex, Dialect, TokenKind};
//!
//! let tokens = lex("x + 1", Dialect::Actor);
//! assert_eq!(tokens.len(), 3); // x, +, 1
//! assert_eq!(tokens[1].kind(), TokenKind::Plus);
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function drives the scanner through a [`TokenStream`] and
//! builds a [`Program`](crate::ast::Program). Binary operators use Pratt
//! parsing (see the [`parser`] module for the precedence table).
//!
//! # Error Handling
//!
//! Nothing here stops at the first error. The scanner turns bad input into
//! [`LexError`]s and keeps going; the parser reports [`Diagnostic`]s, puts
//! error nodes in the tree, and resynchronises at the next statement.
//! [`Diagnostic::to_report`] renders a diagnostic with miette.

mod diagnostic;
mod dialect;
mod error;
mod lexer;
pub mod parser;
mod source;
mod span;
mod token;
mod token_stream;


pub use diagnostic::{Diagnostic, DiagnosticKind, RenderedDiagnostic, Reporter, Severity};
pub use dialect::{DEFAULT_MAX_DIAGNOSTICS, DEFAULT_MAX_NESTING_DEPTH, Dialect, ParseOptions};
pub use error::{LexError, LexErrorKind};
pub use lexer::{
    LexGoal, ScanState, Scanner, is_identifier_part, is_identifier_start, is_invisible_format,
    is_trivia_whitespace, lex, lex_with_eof, tokenize,
};
pub use parser::{ParseOutput, parse};
pub use source::{Position, SourceBuffer, is_line_terminator};
pub use span::Span;
pub use token::{Keyword, Token, TokenKind, Trivia};
pub use token_stream::{Checkpoint, TokenStream};
