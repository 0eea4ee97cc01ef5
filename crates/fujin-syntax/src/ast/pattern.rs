// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Binding and assignment patterns, and parameters.
//!
//! Binding patterns (declarators, parameters, `catch`) contain only names
//! and nested patterns. Assignment patterns, the left side of `=`, may also
//! target members and subscripts through [`Pattern::Expression`].

use ecow::EcoString;

use super::{Expression, Identifier, PropertyKey, Type};
use crate::source_analysis::Span;

/// A destructuring target.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A plain name.
    Identifier(Identifier),

    /// `{ a, b: c, d = 1 }`
    Object {
        /// Properties in source order.
        properties: Vec<ObjectPatternProperty>,
        /// Source location.
        span: Span,
    },

    /// `[a, , b = 1, ...rest]`
    Array {
        /// Elements, including holes.
        elements: Vec<PatternElement>,
        /// Source location.
        span: Span,
    },

    /// `target = default`
    Assignment {
        /// The pattern receiving the value.
        target: Box<Pattern>,
        /// Used when the value is missing.
        default: Box<Expression>,
        /// Source location.
        span: Span,
    },

    /// A member, subscript or parenthesized target of an assignment.
    Expression(Box<Expression>),

    /// An error node for an invalid target.
    Error {
        /// A description of what went wrong.
        message: EcoString,
        /// Source location of the erroneous code.
        span: Span,
    },
}

impl Pattern {
    /// Returns the span of this pattern.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Identifier(id) => id.span,
            Self::Expression(expression) => expression.span(),
            Self::Object { span, .. }
            | Self::Array { span, .. }
            | Self::Assignment { span, .. }
            | Self::Error { span, .. } => *span,
        }
    }

    /// Returns true if this is an error node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Calls `f` on every name this pattern binds, in source order.
    pub fn for_each_binding<'a>(&'a self, f: &mut impl FnMut(&'a Identifier)) {
        match self {
            Self::Identifier(id) => f(id),
            Self::Object { properties, .. } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Pair { value, .. } => value.for_each_binding(f),
                        ObjectPatternProperty::Shorthand { name, .. } => f(name),
                    }
                }
            }
            Self::Array { elements, .. } => {
                for element in elements {
                    match element {
                        PatternElement::Item(pattern) | PatternElement::Rest { pattern, .. } => {
                            pattern.for_each_binding(f);
                        }
                        PatternElement::Hole(_) => {}
                    }
                }
            }
            Self::Assignment { target, .. } => target.for_each_binding(f),
            Self::Expression(_) | Self::Error { .. } => {}
        }
    }
}

/// A property of an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatternProperty {
    /// `key: pattern`
    Pair {
        /// The property read.
        key: PropertyKey,
        /// Where its value goes.
        value: Pattern,
        /// Source location.
        span: Span,
    },
    /// `name` or `name = default`
    Shorthand {
        /// The property read and the name bound.
        name: Identifier,
        /// Used when the property is missing.
        default: Option<Expression>,
        /// Source location.
        span: Span,
    },
}

impl ObjectPatternProperty {
    /// Returns the span of this property.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Pair { span, .. } | Self::Shorthand { span, .. } => *span,
        }
    }
}

/// An element of an array pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    /// A nested pattern, possibly with a default.
    Item(Pattern),
    /// `...pattern`, only in last position.
    Rest {
        /// Receives the remaining elements.
        pattern: Pattern,
        /// Source location, including `...`.
        span: Span,
    },
    /// An elided slot.
    Hole(Span),
}

impl PatternElement {
    /// Returns the span of this element.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Item(pattern) => pattern.span(),
            Self::Rest { span, .. } | Self::Hole(span) => *span,
        }
    }
}

/// A formal parameter of an actor, function, arrow or function type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The bound name or destructuring pattern.
    pub pattern: Pattern,
    /// The `: Type` annotation.
    pub type_annotation: Option<Type>,
    /// The `= default` value.
    pub default: Option<Expression>,
    /// Whether this is a `...rest` parameter.
    pub rest: bool,
    /// Source location.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str, start: u32) -> Identifier {
        let end = start + u32::try_from(name.len()).unwrap();
        Identifier::new(name, Span::new(start, end))
    }

    #[test]
    fn bindings_in_source_order() {
        // {a, b: [c, ...d]}
        let pattern = Pattern::Object {
            properties: vec![
                ObjectPatternProperty::Shorthand {
                    name: id("a", 1),
                    default: None,
                    span: Span::new(1, 2),
                },
                ObjectPatternProperty::Pair {
                    key: PropertyKey::Identifier(id("b", 4)),
                    value: Pattern::Array {
                        elements: vec![
                            PatternElement::Item(Pattern::Identifier(id("c", 8))),
                            PatternElement::Rest {
                                pattern: Pattern::Identifier(id("d", 14)),
                                span: Span::new(11, 15),
                            },
                        ],
                        span: Span::new(7, 16),
                    },
                    span: Span::new(4, 16),
                },
            ],
            span: Span::new(0, 17),
        };
        let mut names = Vec::new();
        pattern.for_each_binding(&mut |id| names.push(id.name.clone()));
        assert_eq!(names, ["a", "c", "d"]);
    }
}
