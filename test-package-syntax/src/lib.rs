// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Case-directory tests for the Fujin front end.
//!
//! Each file in `cases/` is a Fujin program whose leading `//` comment lines
//! may carry directives:
//!
//! ```text
//! // dialect: full
//! // expect: clean
//! // expect: statements 2
//! // expect: diagnostics 1
//! // expect: lexical 1
//! // expect: error mismatched closing tag
//! ```
//!
//! `dialect` defaults to `actor`. `error` matches a substring of some
//! diagnostic's message. A case with no `expect` directives must parse
//! cleanly.

use std::fmt::Write as _;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use fujin_syntax::ast::{Declaration, ExportDeclaration, Statement};
use fujin_syntax::source_analysis::{
    DiagnosticKind, Dialect, ParseOptions, ParseOutput, SourceBuffer, parse,
};

/// What a case file says should happen when it is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// No diagnostics at all.
    Clean,
    /// Exactly this many top-level statements.
    Statements(usize),
    /// Exactly this many diagnostics of any kind.
    Diagnostics(usize),
    /// Exactly this many lexical diagnostics.
    Lexical(usize),
    /// Some diagnostic message contains this text.
    Error(String),
}

/// A loaded case file.
#[derive(Debug, Clone)]
pub struct Case {
    /// File stem, e.g. `asi_two_declarations`.
    pub name: String,
    /// Full path to the file.
    pub path: Utf8PathBuf,
    /// Dialect from the `dialect:` directive.
    pub dialect: Dialect,
    /// Directives in file order.
    pub expectations: Vec<Expectation>,
    /// The file contents.
    pub source: String,
}

impl Case {
    /// Parses the case with default limits.
    #[must_use]
    pub fn parse(&self) -> ParseOutput {
        let source = SourceBuffer::named(self.path.as_str(), self.source.as_str());
        parse(&source, &ParseOptions::new(self.dialect))
    }

    /// Parses the case and returns every unmet expectation, described.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        let output = self.parse();
        let mut failures = Vec::new();
        let expectations = if self.expectations.is_empty() {
            &[Expectation::Clean][..]
        } else {
            &self.expectations[..]
        };
        for expectation in expectations {
            let met = match expectation {
                Expectation::Clean => output.diagnostics.is_empty(),
                Expectation::Statements(n) => output.program.statements.len() == *n,
                Expectation::Diagnostics(n) => output.diagnostics.len() == *n,
                Expectation::Lexical(n) => {
                    output
                        .diagnostics
                        .iter()
                        .filter(|d| d.kind == DiagnosticKind::Lexical)
                        .count()
                        == *n
                }
                Expectation::Error(text) => output
                    .diagnostics
                    .iter()
                    .any(|d| d.message.contains(text.as_str())),
            };
            if !met {
                failures.push(format!(
                    "{}: expected {expectation:?}\n{}",
                    self.name,
                    outline(&output)
                ));
            }
        }
        failures
    }
}

/// The `cases/` directory of this package.
#[must_use]
pub fn cases_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cases")
}

/// Loads `cases/{name}.fj`.
pub fn load(name: &str) -> io::Result<Case> {
    load_path(&cases_dir().join(format!("{name}.fj")))
}

/// Loads every `.fj` file in `cases/`, sorted by name.
pub fn load_all() -> io::Result<Vec<Case>> {
    let mut cases = Vec::new();
    for entry in cases_dir().read_dir_utf8()? {
        let path = entry?.into_path();
        if path.extension() == Some("fj") {
            cases.push(load_path(&path)?);
        }
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

fn load_path(path: &Utf8Path) -> io::Result<Case> {
    let source = std::fs::read_to_string(path)?;
    let name = path.file_stem().unwrap_or_default().to_string();
    let mut dialect = Dialect::Actor;
    let mut expectations = Vec::new();
    for line in source.lines() {
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };
        let comment = comment.trim();
        if let Some(value) = comment.strip_prefix("dialect:") {
            dialect = match value.trim() {
                "actor" => Dialect::Actor,
                "full" => Dialect::Full,
                other => return Err(invalid(path, &format!("unknown dialect `{other}`"))),
            };
        } else if let Some(value) = comment.strip_prefix("expect:") {
            expectations.push(parse_expectation(value.trim()).ok_or_else(|| {
                invalid(path, &format!("unknown expectation `{}`", value.trim()))
            })?);
        }
    }
    Ok(Case {
        name,
        path: path.to_owned(),
        dialect,
        expectations,
        source,
    })
}

fn parse_expectation(text: &str) -> Option<Expectation> {
    let (word, rest) = text.split_once(' ').unwrap_or((text, ""));
    let count = || rest.trim().parse().ok();
    match word {
        "clean" => Some(Expectation::Clean),
        "statements" => count().map(Expectation::Statements),
        "diagnostics" => count().map(Expectation::Diagnostics),
        "lexical" => count().map(Expectation::Lexical),
        "error" if !rest.is_empty() => Some(Expectation::Error(rest.trim().to_string())),
        _ => None,
    }
}

fn invalid(path: &Utf8Path, message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("{path}: {message}"))
}

// ============================================================================
// Outline
// ============================================================================

/// A compact, stable rendering of a parse: one line per top-level statement
/// followed by one line per diagnostic.
#[must_use]
pub fn outline(output: &ParseOutput) -> String {
    let mut out = String::new();
    for statement in &output.program.statements {
        let _ = writeln!(out, "{}", statement_label(statement));
    }
    for diagnostic in &output.diagnostics {
        let _ = writeln!(out, "! {diagnostic}");
    }
    out
}

fn declaration_label(declaration: &Declaration) -> &'static str {
    match declaration {
        Declaration::Lexical(_) => "lexical",
        Declaration::Actor(_) => "actor",
        Declaration::TypeAlias(_) => "type",
        Declaration::Function(_) => "function",
        Declaration::Interface(_) => "interface",
    }
}

fn statement_label(statement: &Statement) -> &'static str {
    match statement {
        Statement::Declaration(declaration) => declaration_label(declaration),
        Statement::Expression { .. } => "expression",
        Statement::Block(_) => "block",
        Statement::Empty { .. } => "empty",
        Statement::If { .. } => "if",
        Statement::For { .. } => "for",
        Statement::Switch { .. } => "switch",
        Statement::Try { .. } => "try",
        Statement::Break { .. } => "break",
        Statement::Continue { .. } => "continue",
        Statement::Return { .. } => "return",
        Statement::Throw { .. } => "throw",
        Statement::Emit { .. } => "emit",
        Statement::Assert { .. } => "assert",
        Statement::Import(_) => "import",
        Statement::Export(ExportDeclaration::Declaration { .. }) => "export declaration",
        Statement::Export(_) => "export",
        Statement::Error { .. } => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directives() {
        assert_eq!(parse_expectation("clean"), Some(Expectation::Clean));
        assert_eq!(parse_expectation("statements 3"), Some(Expectation::Statements(3)));
        assert_eq!(
            parse_expectation("error expected `;`"),
            Some(Expectation::Error("expected `;`".to_string()))
        );
        assert_eq!(parse_expectation("statements many"), None);
        assert_eq!(parse_expectation("error"), None);
    }
}
