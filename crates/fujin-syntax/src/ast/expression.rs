// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expressions and their operators.

use std::fmt;

use ecow::EcoString;

use super::{
    Block, FjxElement, Identifier, Parameter, Pattern, PropertyKey, StringLiteral, Type,
    TypeParameter,
};
use crate::source_analysis::Span;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A variable reference.
    Identifier(Identifier),

    /// `@name`
    ActionIdentifier(Identifier),

    /// The meta property `@`.
    Meta {
        /// Source location.
        span: Span,
    },

    /// A numeric literal, kept as written.
    Number {
        /// The literal text, including any prefix and separators.
        raw: EcoString,
        /// Source location.
        span: Span,
    },

    /// A string literal.
    String(StringLiteral),

    /// `true` or `false`.
    Boolean {
        /// The literal value.
        value: bool,
        /// Source location.
        span: Span,
    },

    /// `null`
    Null {
        /// Source location.
        span: Span,
    },

    /// `` `text ${expr}` ``
    Template(TemplateLiteral),

    /// `/pattern/flags`
    Regex {
        /// The text between the slashes.
        pattern: EcoString,
        /// Trailing flags, possibly empty.
        flags: EcoString,
        /// Source location.
        span: Span,
    },

    /// `[a, , ...b]`
    Array {
        /// Elements, including holes.
        elements: Vec<Element>,
        /// Source location.
        span: Span,
    },

    /// `{ a: 1, b, ...c }`
    Object {
        /// Members in source order.
        members: Vec<ObjectMember>,
        /// Source location.
        span: Span,
    },

    /// `function name(params) { ... }` in expression position.
    Function(Box<Function>),

    /// `(a, b) => a + b`
    Arrow(Box<ArrowFunction>),

    /// `(expression)`
    Parenthesized {
        /// The inner expression.
        expression: Box<Expression>,
        /// Source location, including the parentheses.
        span: Span,
    },

    /// `a, b, c`
    Sequence {
        /// Two or more expressions.
        expressions: Vec<Expression>,
        /// Source location.
        span: Span,
    },

    /// `!a`, `-a`, `+a`, `~a`
    Unary {
        /// The operator.
        operator: UnaryOperator,
        /// The operand.
        operand: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `++a`, `a--`
    Update {
        /// `++` or `--`.
        operator: UpdateOperator,
        /// Whether the operator came first.
        prefix: bool,
        /// The updated expression.
        operand: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `await value`
    Await {
        /// The awaited value.
        argument: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `left op right`
    Binary {
        /// The operator.
        operator: BinaryOperator,
        /// Left operand.
        left: Box<Expression>,
        /// Right operand.
        right: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `target = value`, `target += value`
    Assignment {
        /// The operator.
        operator: AssignmentOperator,
        /// The assigned pattern.
        target: Box<Pattern>,
        /// The assigned value.
        value: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `test ? consequent : alternate`
    Conditional {
        /// The condition.
        test: Box<Expression>,
        /// Value when true.
        consequent: Box<Expression>,
        /// Value when false.
        alternate: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// `object.property` or `object?.property`
    Member {
        /// The accessed value.
        object: Box<Expression>,
        /// The property name. Reserved words are allowed.
        property: Identifier,
        /// Whether `?.` was used.
        optional: bool,
        /// Source location.
        span: Span,
    },

    /// `object[index]` or `object?.[index]`
    Subscript {
        /// The accessed value.
        object: Box<Expression>,
        /// The index expression.
        index: Box<Expression>,
        /// Whether `?.` was used.
        optional: bool,
        /// Source location.
        span: Span,
    },

    /// `callee(arguments)` or `callee?.(arguments)`
    Call {
        /// The called expression.
        callee: Box<Expression>,
        /// Arguments; spreads allowed, holes are not.
        arguments: Vec<Element>,
        /// Whether `?.` was used.
        optional: bool,
        /// Source location.
        span: Span,
    },

    /// ``tag`text` ``
    TaggedTemplate {
        /// The tag function.
        tag: Box<Expression>,
        /// The template.
        template: TemplateLiteral,
        /// Source location.
        span: Span,
    },

    /// FJX markup.
    Fjx(Box<FjxElement>),

    /// An error node for unparseable code.
    ///
    /// This allows the parser to recover from errors and continue.
    Error {
        /// A description of what went wrong.
        message: EcoString,
        /// Source location of the erroneous code.
        span: Span,
    },
}

impl Expression {
    /// Returns the span of this expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Identifier(id) | Self::ActionIdentifier(id) => id.span,
            Self::String(s) => s.span,
            Self::Template(t) => t.span,
            Self::Function(f) => f.span,
            Self::Arrow(a) => a.span,
            Self::Fjx(element) => element.span,
            Self::Meta { span }
            | Self::Number { span, .. }
            | Self::Boolean { span, .. }
            | Self::Null { span }
            | Self::Regex { span, .. }
            | Self::Array { span, .. }
            | Self::Object { span, .. }
            | Self::Parenthesized { span, .. }
            | Self::Sequence { span, .. }
            | Self::Unary { span, .. }
            | Self::Update { span, .. }
            | Self::Await { span, .. }
            | Self::Binary { span, .. }
            | Self::Assignment { span, .. }
            | Self::Conditional { span, .. }
            | Self::Member { span, .. }
            | Self::Subscript { span, .. }
            | Self::Call { span, .. }
            | Self::TaggedTemplate { span, .. }
            | Self::Error { span, .. } => *span,
        }
    }

    /// Returns true if this is an error node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparenthesized(&self) -> &Self {
        let mut expression = self;
        while let Self::Parenthesized { expression: inner, .. } = expression {
            expression = inner;
        }
        expression
    }
}

/// An element of an array literal or an argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A plain value.
    Item(Expression),
    /// `...value`
    Spread {
        /// The spread value.
        argument: Expression,
        /// Source location, including `...`.
        span: Span,
    },
    /// An elided array slot, located at the comma that ends it.
    Hole(Span),
}

impl Element {
    /// Returns the span of this element.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Item(expression) => expression.span(),
            Self::Spread { span, .. } | Self::Hole(span) => *span,
        }
    }
}

/// A member of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// `key: value`
    Property {
        /// The property name.
        key: PropertyKey,
        /// The value.
        value: Expression,
        /// Source location.
        span: Span,
    },
    /// `name`, short for `name: name`.
    Shorthand(Identifier),
    /// `...value`
    Spread {
        /// The spread value.
        argument: Expression,
        /// Source location, including `...`.
        span: Span,
    },
}

impl ObjectMember {
    /// Returns the span of this member.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Shorthand(id) => id.span,
            Self::Property { span, .. } | Self::Spread { span, .. } => *span,
        }
    }
}

/// A template literal.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    /// Text runs and substitutions in source order.
    pub parts: Vec<TemplatePart>,
    /// Source location, including the backticks.
    pub span: Span,
}

/// One piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Raw text, escape sequences included as written.
    Text {
        /// The raw text.
        raw: EcoString,
        /// Source location.
        span: Span,
    },
    /// `${expression}`
    Substitution {
        /// The substituted expression.
        expression: Expression,
        /// Source location, including `${` and `}`.
        span: Span,
    },
}

impl TemplatePart {
    /// Returns the span of this part.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Text { span, .. } | Self::Substitution { span, .. } => *span,
        }
    }
}

/// A function declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Whether `async` was written.
    pub is_async: bool,
    /// The name; required for declarations.
    pub name: Option<Identifier>,
    /// Type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// The `: Type` return annotation.
    pub return_type: Option<Type>,
    /// The body.
    pub body: Block,
    /// Source location.
    pub span: Span,
}

/// An arrow function.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    /// Whether `async` was written.
    pub is_async: bool,
    /// Type parameters.
    pub type_parameters: Vec<TypeParameter>,
    /// Parameters; a bare `x => ...` has exactly one.
    pub parameters: Vec<Parameter>,
    /// The `: Type` return annotation.
    pub return_type: Option<Type>,
    /// The body.
    pub body: ArrowBody,
    /// Source location.
    pub span: Span,
}

/// The body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> expression`
    Expression(Box<Expression>),
    /// `=> { statements }`
    Block(Block),
}

impl ArrowBody {
    /// Returns the span of this body.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(expression) => expression.span(),
            Self::Block(block) => block.span,
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Prefix operators other than `++`, `--` and `await`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `!`
    Not,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitwiseNot,
}

impl UnaryOperator {
    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Plus => "+",
            Self::BitwiseNot => "~",
        }
    }
}

/// `++` or `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl UpdateOperator {
    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `**`
    Exponent,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `>>>`
    UnsignedShiftRight,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    LooseEqual,
    /// `!=`
    LooseNotEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `&`
    BitwiseAnd,
    /// `^`
    BitwiseXor,
    /// `|`
    BitwiseOr,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `??`
    Nullish,
}

impl BinaryOperator {
    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exponent => "**",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LooseEqual => "==",
            Self::LooseNotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::BitwiseAnd => "&",
            Self::BitwiseXor => "^",
            Self::BitwiseOr => "|",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Nullish => "??",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `=` and the compound assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    /// `=`
    Assign,
    /// `+=`, `-=`, `&&=` and the rest: the binary operator applied before
    /// assigning.
    Compound(BinaryOperator),
}

impl AssignmentOperator {
    /// Returns true for `=`.
    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::Assign)
    }
}

impl fmt::Display for AssignmentOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => f.write_str("="),
            Self::Compound(operator) => write!(f, "{operator}="),
        }
    }
}
