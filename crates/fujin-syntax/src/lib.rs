// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fujin front end.
//!
//! This crate turns Fujin source text into a syntax tree:
//! - Lexical analysis (goal-driven scanning, automatic semicolons)
//! - Parsing (AST construction with error recovery)
//! - Diagnostics (lexical, syntax and structural, renderable with miette)
//!
//! Both the actor dialect and the full JavaScript/TypeScript-like dialect
//! go through the same pipeline; [`Dialect`](source_analysis::Dialect)
//! selects which productions are available.
//!
//! ```
//! use fujin_syntax::source_analysis::Dialect;
//!
//! let output = fujin_syntax::parse_str("actor @main { emit 1; }", Dialect::Actor);
//! assert!(output.diagnostics.is_empty());
//! assert_eq!(output.program.statements.len(), 1);
//! ```

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod ast_walker;
pub mod source_analysis;

use source_analysis::{Dialect, ParseOptions, ParseOutput, SourceBuffer};

/// Parses `source` in `dialect` with default limits.
#[must_use]
pub fn parse_str(source: &str, dialect: Dialect) -> ParseOutput {
    source_analysis::parse(&SourceBuffer::new(source), &ParseOptions::new(dialect))
}

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Declaration, Expression, Identifier, Pattern, Program, Statement, Type};
    pub use crate::parse_str;
    pub use crate::source_analysis::{
        Diagnostic, Dialect, ParseOptions, ParseOutput, SourceBuffer, Span, parse,
    };
}
