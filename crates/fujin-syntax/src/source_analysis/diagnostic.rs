// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics and the per-parse reporter.
//!
//! Diagnostics accumulate in source order and are never removed once
//! committed. While the parser is speculating (the arrow-function attempt),
//! new diagnostics are staged; a successful attempt commits them and a
//! rollback discards them.
//!
//! Rendering goes through [`miette`]: [`Diagnostic::to_report`] produces a
//! labelled report over the original [`SourceBuffer`].

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use std::fmt;

use ecow::{EcoString, eco_format};
use miette::SourceSpan;

use super::{LexError, Position, SourceBuffer, Span};

/// Which stage of the front end found the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Scanner-level: unterminated literal or comment, invalid escape,
    /// invalid number, unexpected character.
    Lexical,
    /// Unexpected token, mismatched tag or delimiter, reserved word used as
    /// an identifier, pattern or type shape mismatch.
    Syntax,
    /// A construct is missing a required clause.
    Structural,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical error",
            Self::Syntax => "syntax error",
            Self::Structural => "structural error",
        })
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The program is not well formed.
    Error,
    /// Accepted, but probably not what was meant.
    Warning,
}

/// A located problem in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// Which stage reported it.
    pub kind: DiagnosticKind,
    /// The error message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Resolved start of `span`.
    pub start: Position,
    /// Resolved end of `span`.
    pub end: Position,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates an error diagnostic. Positions are resolved when the
    /// diagnostic is committed to a [`Reporter`].
    #[must_use]
    pub fn error(kind: DiagnosticKind, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            span,
            start: Position::default(),
            end: Position::default(),
            hint: None,
        }
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<EcoString>, span: Span) -> Self {
        Self::error(DiagnosticKind::Syntax, message, span)
    }

    /// Creates a structural error.
    #[must_use]
    pub fn structural(message: impl Into<EcoString>, span: Span) -> Self {
        Self::error(DiagnosticKind::Structural, message, span)
    }

    /// Creates a warning.
    #[must_use]
    pub fn warning(kind: DiagnosticKind, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message, span)
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns true for error severity.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Renders this diagnostic as a [`miette::Report`] over `source`.
    #[must_use]
    pub fn to_report(&self, source: &SourceBuffer) -> miette::Report {
        miette::Report::new(RenderedDiagnostic::new(self, source))
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        Self::error(DiagnosticKind::Lexical, error.to_string(), error.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.start, self.kind, self.message)
    }
}

/// A diagnostic bundled with its source for miette rendering.
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    message: String,
    #[source_code]
    src: miette::NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
    #[help]
    help: Option<String>,
    #[diagnostic(severity)]
    severity: miette::Severity,
    #[diagnostic(code)]
    code: String,
}

impl RenderedDiagnostic {
    fn new(diagnostic: &Diagnostic, source: &SourceBuffer) -> Self {
        let (severity, label) = match diagnostic.severity {
            Severity::Error => (miette::Severity::Error, "error here"),
            Severity::Warning => (miette::Severity::Warning, "warning here"),
        };
        let code = match diagnostic.kind {
            DiagnosticKind::Lexical => "fujin::lexical",
            DiagnosticKind::Syntax => "fujin::syntax",
            DiagnosticKind::Structural => "fujin::structural",
        };
        Self {
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source.name(), source.text().to_string()),
            span: diagnostic.span.into(),
            label: label.to_string(),
            help: diagnostic.hint.as_ref().map(ToString::to_string),
            severity,
            code: code.to_string(),
        }
    }
}

/// Collects diagnostics for one parse.
#[derive(Debug)]
pub struct Reporter {
    source: SourceBuffer,
    committed: Vec<Diagnostic>,
    staged: Vec<Vec<Diagnostic>>,
    limit: usize,
    limit_reached: bool,
}

impl Reporter {
    /// Creates a reporter that stops accepting diagnostics after `limit`.
    #[must_use]
    pub fn new(source: SourceBuffer, limit: usize) -> Self {
        Self {
            source,
            committed: Vec::new(),
            staged: Vec::new(),
            limit: limit.max(1),
            limit_reached: false,
        }
    }

    /// Records a diagnostic, staging it if a speculation is open.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        if let Some(stage) = self.staged.last_mut() {
            stage.push(diagnostic);
        } else {
            self.commit(diagnostic);
        }
    }

    fn commit(&mut self, mut diagnostic: Diagnostic) {
        if self.limit_reached {
            return;
        }
        let (start, end) = self.source.positions(diagnostic.span);
        diagnostic.start = start;
        diagnostic.end = end;
        self.committed.push(diagnostic);
        if self.committed.len() >= self.limit {
            self.limit_reached = true;
            let span = Span::empty_at(diagnostic_end(&self.committed));
            let (start, end) = self.source.positions(span);
            self.committed.push(Diagnostic {
                start,
                end,
                ..Diagnostic::syntax(
                    eco_format!("too many errors ({}); parsing stopped", self.limit),
                    span,
                )
            });
            tracing::debug!(limit = self.limit, "diagnostic limit reached");
        }
    }

    /// Opens a speculation: diagnostics are held back until it ends.
    pub fn begin_speculation(&mut self) {
        self.staged.push(Vec::new());
    }

    /// Closes the innermost speculation, keeping its diagnostics.
    pub fn commit_speculation(&mut self) {
        if let Some(stage) = self.staged.pop() {
            for diagnostic in stage {
                self.report(diagnostic);
            }
        }
    }

    /// Closes the innermost speculation, dropping its diagnostics.
    pub fn discard_speculation(&mut self) {
        self.staged.pop();
    }

    /// Returns true if the innermost open speculation has reported a
    /// syntax or structural error. Lexical errors do not count: they are
    /// reported again whichever way the parse goes.
    #[must_use]
    pub fn speculation_failed(&self) -> bool {
        self.staged.last().is_some_and(|stage| {
            stage
                .iter()
                .any(|d| d.is_error() && d.kind != DiagnosticKind::Lexical)
        })
    }

    /// Returns true once the limit has been hit.
    #[must_use]
    pub const fn limit_reached(&self) -> bool {
        self.limit_reached
    }

    /// Returns true if any committed diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.committed.iter().any(Diagnostic::is_error)
    }

    /// Consumes the reporter. Open speculations are committed first.
    #[must_use]
    pub fn finish(mut self) -> Vec<Diagnostic> {
        while !self.staged.is_empty() {
            self.commit_speculation();
        }
        self.committed
    }
}

fn diagnostic_end(diagnostics: &[Diagnostic]) -> u32 {
    diagnostics.last().map_or(0, |d| d.span.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter(limit: usize) -> Reporter {
        Reporter::new(SourceBuffer::new("let x = 1\nlet y = 2"), limit)
    }

    #[test]
    fn committed_diagnostics_get_positions() {
        let mut r = reporter(10);
        r.report(Diagnostic::syntax("bad", Span::new(14, 15)));
        let diagnostics = r.finish();
        assert_eq!(diagnostics[0].start.line, 2);
        assert_eq!(diagnostics[0].start.column, 5);
        assert_eq!(diagnostics[0].end.column, 6);
    }

    #[test]
    fn discarded_speculation_drops_diagnostics() {
        let mut r = reporter(10);
        r.report(Diagnostic::syntax("first", Span::new(0, 1)));
        r.begin_speculation();
        r.report(Diagnostic::syntax("speculative", Span::new(2, 3)));
        assert!(r.speculation_failed());
        r.discard_speculation();
        let messages: Vec<_> = r.finish().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, ["first"]);
    }

    #[test]
    fn lexical_errors_do_not_fail_a_speculation() {
        let mut r = reporter(10);
        r.begin_speculation();
        r.report(Diagnostic::error(DiagnosticKind::Lexical, "bad escape", Span::new(0, 2)));
        assert!(!r.speculation_failed());
        r.discard_speculation();
        assert!(r.finish().is_empty());
    }

    #[test]
    fn committed_speculation_keeps_diagnostics_in_order() {
        let mut r = reporter(10);
        r.begin_speculation();
        r.report(Diagnostic::syntax("a", Span::new(0, 1)));
        r.begin_speculation();
        r.report(Diagnostic::syntax("b", Span::new(1, 2)));
        r.commit_speculation();
        r.commit_speculation();
        r.report(Diagnostic::syntax("c", Span::new(2, 3)));
        let messages: Vec<_> = r.finish().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn limit_adds_one_final_diagnostic() {
        let mut r = reporter(2);
        for i in 0..5 {
            r.report(Diagnostic::syntax("bad", Span::new(i, i + 1)));
        }
        assert!(r.limit_reached());
        let diagnostics = r.finish();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics[2].message.starts_with("too many errors"));
    }

    #[test]
    fn lex_errors_become_lexical_diagnostics() {
        let diagnostic: Diagnostic =
            LexError::new(super::super::LexErrorKind::UnterminatedString, Span::new(3, 4)).into();
        assert_eq!(diagnostic.kind, DiagnosticKind::Lexical);
        assert_eq!(diagnostic.message, "unterminated string literal");
    }

    #[test]
    fn report_renders_with_label() {
        let source = SourceBuffer::named("main.fj", "let = 1");
        let diagnostic = Diagnostic::syntax("expected a binding", Span::new(4, 5))
            .with_hint("name the variable");
        let rendered = RenderedDiagnostic::new(&diagnostic, &source);
        assert_eq!(rendered.span.offset(), 4);
        assert_eq!(rendered.span.len(), 1);
        assert_eq!(rendered.label, "error here");
        assert_eq!(rendered.code, "fujin::syntax");
        assert_eq!(rendered.help.as_deref(), Some("name the variable"));
        assert_eq!(diagnostic.to_report(&source).to_string(), "expected a binding");
    }
}
