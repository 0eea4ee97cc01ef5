// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statements, declarations and module items.

use ecow::EcoString;

use super::{
    Expression, Function, Identifier, ModuleExportName, Parameter, Pattern, StringLiteral, Type,
    TypeMember, TypeParameter,
};
use crate::source_analysis::Span;

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A declaration in statement position.
    Declaration(Declaration),

    /// An expression followed by a terminator.
    Expression {
        /// The expression.
        expression: Expression,
        /// Source location, including an explicit `;`.
        span: Span,
    },

    /// `{ ... }`
    Block(Block),

    /// A lone `;`.
    Empty {
        /// Source location.
        span: Span,
    },

    /// `if (condition) consequent else alternate`
    If {
        /// The parenthesized condition.
        condition: Expression,
        /// Runs when the condition holds.
        consequent: Box<Statement>,
        /// The `else` branch.
        alternate: Option<Box<Statement>>,
        /// Source location.
        span: Span,
    },

    /// `for (init; condition; update) body`, the only loop form.
    For {
        /// The initializer, if any.
        init: Option<ForInit>,
        /// The loop condition, if any.
        condition: Option<Expression>,
        /// The update expression, if any.
        update: Option<Expression>,
        /// The loop body.
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },

    /// `switch (discriminant) { case ...: ... default: ... }`
    Switch {
        /// The value being switched on.
        discriminant: Expression,
        /// Clauses in source order.
        cases: Vec<SwitchCase>,
        /// Source location.
        span: Span,
    },

    /// `try { } catch (e) { } finally { }`
    Try {
        /// The protected block.
        block: Block,
        /// The `catch` clause.
        handler: Option<CatchClause>,
        /// The `finally` block.
        finalizer: Option<Block>,
        /// Source location.
        span: Span,
    },

    /// `break;`
    Break {
        /// Source location.
        span: Span,
    },

    /// `continue;`
    Continue {
        /// Source location.
        span: Span,
    },

    /// `return value;`
    Return {
        /// The returned value.
        argument: Option<Expression>,
        /// Source location.
        span: Span,
    },

    /// `throw value;`
    Throw {
        /// The thrown value.
        argument: Expression,
        /// Source location.
        span: Span,
    },

    /// `emit message;`
    Emit {
        /// The emitted message.
        message: Expression,
        /// Source location.
        span: Span,
    },

    /// `assert condition, message;`
    Assert {
        /// The asserted condition.
        condition: Expression,
        /// The optional failure message.
        message: Option<Expression>,
        /// Source location.
        span: Span,
    },

    /// An `import` statement.
    Import(ImportDeclaration),

    /// An `export` statement.
    Export(ExportDeclaration),

    /// An error node for an unparseable statement.
    Error {
        /// A description of what went wrong.
        message: EcoString,
        /// Source location of the erroneous code.
        span: Span,
    },
}

impl Statement {
    /// Returns the span of this statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Declaration(declaration) => declaration.span(),
            Self::Block(block) => block.span,
            Self::Import(import) => import.span,
            Self::Export(export) => export.span(),
            Self::Expression { span, .. }
            | Self::Empty { span }
            | Self::If { span, .. }
            | Self::For { span, .. }
            | Self::Switch { span, .. }
            | Self::Try { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Return { span, .. }
            | Self::Throw { span, .. }
            | Self::Emit { span, .. }
            | Self::Assert { span, .. }
            | Self::Error { span, .. } => *span,
        }
    }

    /// Returns true if this is an error node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements.
    pub statements: Vec<Statement>,
    /// Source location, including the braces.
    pub span: Span,
}

/// The first clause of a `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `let i = 0`
    Declaration(LexicalDeclaration),
    /// `i = 0`
    Expression(Expression),
}

/// A `case` or `default` clause. The body is a flat statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// The tested value; `None` for `default`.
    pub test: Option<Expression>,
    /// Statements up to the next clause.
    pub body: Vec<Statement>,
    /// Source location.
    pub span: Span,
}

/// `catch (parameter) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The bound name or destructuring pattern.
    pub parameter: Option<Pattern>,
    /// The handler body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

// ============================================================================
// Declarations
// ============================================================================

/// A declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `let` / `const`
    Lexical(LexicalDeclaration),
    /// `actor @name (...) { ... }`
    Actor(ActorDeclaration),
    /// `type Name = ...;`
    TypeAlias(TypeAlias),
    /// `function name(...) { ... }`
    Function(Function),
    /// `interface Name { ... }`
    Interface(Interface),
}

impl Declaration {
    /// Returns the span of this declaration.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lexical(d) => d.span,
            Self::Actor(d) => d.span,
            Self::TypeAlias(d) => d.span,
            Self::Function(d) => d.span,
            Self::Interface(d) => d.span,
        }
    }
}

/// `let` or `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `let`
    Let,
    /// `const`
    Const,
}

/// `let a = 1, {b}: T = c;`
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalDeclaration {
    /// `let` or `const`.
    pub kind: DeclarationKind,
    /// One or more declarators.
    pub declarators: Vec<VariableDeclarator>,
    /// Source location.
    pub span: Span,
}

/// One `name: Type = init` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// An identifier or a destructuring pattern.
    pub target: Pattern,
    /// The `: Type` annotation.
    pub type_annotation: Option<Type>,
    /// The initializer.
    pub init: Option<Expression>,
    /// Source location.
    pub span: Span,
}

/// `actor @name | @alias <T> (params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ActorDeclaration {
    /// The action identifiers naming this actor, at least one.
    pub names: Vec<Identifier>,
    /// Type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// The parameter list, if one was written.
    pub parameters: Option<Vec<Parameter>>,
    /// The actor body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

/// `type Name<T> = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    /// The declared name.
    pub name: TypeAliasName,
    /// Type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// The aliased type.
    pub value: Type,
    /// Source location.
    pub span: Span,
}

/// The name of a type alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAliasName {
    /// `type Name = ...`
    Plain(Identifier),
    /// `type @annotation(Name) = ...`
    Annotated {
        /// The annotation name after `@`.
        annotation: Identifier,
        /// The declared type name.
        target: Identifier,
        /// Source location from `@` to `)`.
        span: Span,
    },
}

impl TypeAliasName {
    /// Returns the span of this name.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Plain(id) => id.span,
            Self::Annotated { span, .. } => *span,
        }
    }

    /// The declared type name.
    #[must_use]
    pub const fn name(&self) -> &Identifier {
        match self {
            Self::Plain(id) | Self::Annotated { target: id, .. } => id,
        }
    }
}

/// `interface Name<T> extends A, B { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    /// The declared name.
    pub name: Identifier,
    /// Type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Extended interfaces.
    pub extends: Vec<Type>,
    /// Body members.
    pub members: Vec<TypeMember>,
    /// Source location.
    pub span: Span,
}

// ============================================================================
// Modules
// ============================================================================

/// `import clause from "source";` or `import "source";`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// What is imported; `None` for a bare side-effect import.
    pub clause: Option<ImportClause>,
    /// The module specifier.
    pub source: StringLiteral,
    /// Source location.
    pub span: Span,
}

/// The bindings of an import: `x`, `* as ns`, `{a, b as c}`, or a default
/// binding followed by one of the other two.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportClause {
    /// The default binding.
    pub default: Option<Identifier>,
    /// `* as name`
    pub namespace: Option<Identifier>,
    /// `{ ... }`
    pub named: Option<Vec<ImportSpecifier>>,
    /// Source location.
    pub span: Span,
}

/// `name` or `name as alias` inside `import { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    /// The exported name.
    pub name: ModuleExportName,
    /// The local binding, if renamed.
    pub alias: Option<Identifier>,
    /// Source location.
    pub span: Span,
}

/// `name` or `name as alias` inside `export { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    /// The local name.
    pub name: ModuleExportName,
    /// The exported name, if renamed.
    pub alias: Option<ModuleExportName>,
    /// Source location.
    pub span: Span,
}

/// The forms of `export`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDeclaration {
    /// `export * from "m";` or `export * as ns from "m";`
    All {
        /// The namespace name.
        alias: Option<ModuleExportName>,
        /// The module specifier.
        source: StringLiteral,
        /// Source location.
        span: Span,
    },
    /// `export { a, b as c } from "m";`
    Named {
        /// The listed names.
        specifiers: Vec<ExportSpecifier>,
        /// The re-exported module.
        source: Option<StringLiteral>,
        /// Source location.
        span: Span,
    },
    /// `export let x = 1;` or `export default actor @a { }`
    Declaration {
        /// The exported declaration.
        declaration: Declaration,
        /// Whether `default` was written.
        default: bool,
        /// Source location.
        span: Span,
    },
    /// `export default expression;`
    DefaultExpression {
        /// The exported value.
        expression: Expression,
        /// Source location.
        span: Span,
    },
}

impl ExportDeclaration {
    /// Returns the span of this export.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::All { span, .. }
            | Self::Named { span, .. }
            | Self::Declaration { span, .. }
            | Self::DefaultExpression { span, .. } => *span,
        }
    }
}
