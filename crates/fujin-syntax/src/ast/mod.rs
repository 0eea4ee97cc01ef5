// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Fujin.
//!
//! The AST represents the structure of a Fujin program after parsing.
//! Every node carries a [`Span`] for error reporting.
//!
//! # Design Philosophy
//!
//! - **All nodes have spans**: a child's span lies inside its parent's, and
//!   siblings appear in source order without overlapping
//! - **Error recovery**: the parser produces incomplete trees with
//!   [`Statement::Error`], [`Expression::Error`], [`Pattern::Error`] and
//!   [`Type::Error`] standing in for code it could not make sense of
//! - **Plain ownership**: nodes own their children through `Box` and `Vec`
//!
//! The four capability sets are separate enums: [`Statement`] (which wraps
//! [`Declaration`]), [`Expression`], [`Pattern`] and [`Type`]. Markup lives
//! in [`FjxElement`].
//!
//! # Example
//!
//! ```
//! use fujin_syntax::ast::{Declaration, Expression, Pattern, Statement};
//! use fujin_syntax::source_analysis::Dialect;
//!
//! let output = fujin_syntax::parse_str("let x = 1 + 2;", Dialect::Actor);
//! let Statement::Declaration(Declaration::Lexical(decl)) = &output.program.statements[0] else {
//!     panic!("expected a declaration");
//! };
//! assert!(matches!(decl.declarators[0].target, Pattern::Identifier(_)));
//! assert!(matches!(decl.declarators[0].init, Some(Expression::Binary { .. })));
//! ```

mod expression;
mod fjx;
mod pattern;
mod statement;
mod types;

pub use expression::{
    ArrowBody, ArrowFunction, AssignmentOperator, BinaryOperator, Element, Expression, Function,
    ObjectMember, TemplateLiteral, TemplatePart, UnaryOperator, UpdateOperator,
};
pub use fjx::{FjxAttribute, FjxAttributeValue, FjxChild, FjxElement, FjxName};
pub use pattern::{ObjectPatternProperty, Parameter, Pattern, PatternElement};
pub use statement::{
    ActorDeclaration, Block, CatchClause, Declaration, DeclarationKind, ExportDeclaration,
    ExportSpecifier, ForInit, ImportClause, ImportDeclaration, ImportSpecifier, Interface,
    LexicalDeclaration, Statement, SwitchCase, TypeAlias, TypeAliasName, VariableDeclarator,
};
pub use types::{LiteralType, PredefinedType, TupleElement, Type, TypeMember, TypeParameter};

use ecow::EcoString;

use crate::source_analysis::Span;

/// The root of a parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// A leading `#!` line.
    pub hashbang: Option<HashBang>,
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
    /// Covers the whole input.
    pub span: Span,
}

/// A `#!` interpreter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBang {
    /// The full line, including `#!`.
    pub text: EcoString,
    /// Source location.
    pub span: Span,
}

/// A name: a variable, a property, a type, or (without its `@`) an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name as written. Action identifiers store the text after `@`.
    pub name: EcoString,
    /// Source location, including any `@`.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A quoted string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// The value with escape sequences decoded.
    pub value: EcoString,
    /// The source text between the quotes.
    pub raw: EcoString,
    /// Source location, including the quotes.
    pub span: Span,
}

/// The name of a property in an object literal, pattern or type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// A plain name. Reserved words are allowed here.
    Identifier(Identifier),
    /// `@name`
    Action(Identifier),
    /// `"name"`
    String(StringLiteral),
    /// `0`, `1.5`
    Number {
        /// The literal as written.
        raw: EcoString,
        /// Source location.
        span: Span,
    },
}

impl PropertyKey {
    /// Returns the span of this key.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Identifier(id) | Self::Action(id) => id.span,
            Self::String(s) => s.span,
            Self::Number { span, .. } => *span,
        }
    }
}

/// A name in an `import`/`export` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleExportName {
    /// `name`
    Identifier(Identifier),
    /// `"name"`
    String(StringLiteral),
    /// The keyword `default`.
    Default(Span),
}

impl ModuleExportName {
    /// Returns the span of this name.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Identifier(id) => id.span,
            Self::String(s) => s.span,
            Self::Default(span) => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_key_span() {
        let key = PropertyKey::Action(Identifier::new("go", Span::new(3, 6)));
        assert_eq!(key.span(), Span::new(3, 6));
        let key = PropertyKey::Number {
            raw: "1".into(),
            span: Span::new(0, 1),
        };
        assert_eq!(key.span(), Span::new(0, 1));
    }

    #[test]
    fn module_export_name_span() {
        assert_eq!(
            ModuleExportName::Default(Span::new(7, 14)).span(),
            Span::new(7, 14)
        );
    }
}
