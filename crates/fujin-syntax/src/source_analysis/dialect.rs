// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Dialect selection and parse configuration.
//!
//! Both dialects run through the same scanner and parser. A [`Dialect`]
//! only switches which productions are reachable and which words are
//! reserved.

use std::fmt;

/// The language dialect to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Fujin proper: actors, `emit`, `assert`, action identifiers and FJX
    /// markup, with a deliberately small operator set.
    #[default]
    Actor,
    /// The fuller JavaScript/TypeScript-like dialect: functions, arrows,
    /// `async`/`await`, interfaces, template strings, regex literals,
    /// tuple and intersection types.
    Full,
}

impl Dialect {
    /// Actor declarations, `emit` and `assert` statements.
    #[must_use]
    pub const fn has_actors(self) -> bool {
        matches!(self, Self::Actor)
    }

    /// FJX markup in expression position.
    #[must_use]
    pub const fn has_fjx(self) -> bool {
        matches!(self, Self::Actor)
    }

    /// Function declarations and expressions, arrows, `return`, `async`.
    #[must_use]
    pub const fn has_functions(self) -> bool {
        matches!(self, Self::Full)
    }

    /// Regex literals.
    #[must_use]
    pub const fn has_regex(self) -> bool {
        matches!(self, Self::Full)
    }

    /// Template strings, plain and tagged.
    #[must_use]
    pub const fn has_templates(self) -> bool {
        matches!(self, Self::Full)
    }

    /// `interface` declarations, tuple, intersection and function types.
    #[must_use]
    pub const fn has_rich_types(self) -> bool {
        matches!(self, Self::Full)
    }

    /// Ternary, bitwise, shift, exponent, nullish, optional chaining,
    /// loose equality and the comma operator.
    #[must_use]
    pub const fn has_full_operators(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => f.write_str("actor"),
            Self::Full => f.write_str("full"),
        }
    }
}

/// Default cap on committed diagnostics before parsing stops.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 100;

/// Default cap on expression, type and statement nesting.
///
/// Each level costs several parser frames; `stacker::maybe_grow` backs the
/// limit so even instrumented fuzzing builds stay within their stack.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Options for a single parse.
///
/// # Examples
///
/// ```
/// use fujin_syntax::source_analysis::{Dialect, ParseOptions};
///
/// let options = ParseOptions::new(Dialect::Full).with_max_diagnostics(10);
/// assert_eq!(options.dialect, Dialect::Full);
/// assert_eq!(options.max_diagnostics, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Which dialect's productions are reachable.
    pub dialect: Dialect,
    /// Parsing stops once this many diagnostics have been committed.
    pub max_diagnostics: usize,
    /// Maximum nesting of expressions, types and statements.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl ParseOptions {
    /// Default options for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Overrides the diagnostic cap. A cap of zero is treated as one.
    #[must_use]
    pub const fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = if max == 0 { 1 } else { max };
        self
    }

    /// Overrides the nesting limit.
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_features_are_disjoint_where_expected() {
        assert!(Dialect::Actor.has_fjx() && !Dialect::Full.has_fjx());
        assert!(Dialect::Full.has_regex() && !Dialect::Actor.has_regex());
        assert!(Dialect::Full.has_templates() && !Dialect::Actor.has_templates());
    }

    #[test]
    fn defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.dialect, Dialect::Actor);
        assert_eq!(options.max_diagnostics, DEFAULT_MAX_DIAGNOSTICS);
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn zero_diagnostic_cap_is_clamped() {
        assert_eq!(ParseOptions::default().with_max_diagnostics(0).max_diagnostics, 1);
    }
}
