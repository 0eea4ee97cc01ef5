// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! FJX markup nodes.

use ecow::EcoString;

use super::{Expression, Identifier, StringLiteral};
use crate::source_analysis::Span;

/// `<name attr=value>children</name>` or `<name attr=value/>`
#[derive(Debug, Clone, PartialEq)]
pub struct FjxElement {
    /// The opening tag name.
    pub name: FjxName,
    /// Attributes in source order.
    pub attributes: Vec<FjxAttribute>,
    /// Children; empty for a self-closing element.
    pub children: Vec<FjxChild>,
    /// The closing tag name; `None` for a self-closing element or one whose
    /// closing tag is missing.
    pub closing_name: Option<FjxName>,
    /// Whether the element was written `<name/>`.
    pub self_closing: bool,
    /// Source location.
    pub span: Span,
}

/// A tag or attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FjxName {
    /// `div`
    Identifier(Identifier),
    /// `@handler`
    Action(Identifier),
}

impl FjxName {
    /// Returns the span of this name.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Identifier(id) | Self::Action(id) => id.span,
        }
    }

    /// Returns true if both names are spelled identically.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identifier(a), Self::Identifier(b)) | (Self::Action(a), Self::Action(b)) => {
                a.name == b.name
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for FjxName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(id) => f.write_str(&id.name),
            Self::Action(id) => write!(f, "@{}", id.name),
        }
    }
}

/// `name=value`
#[derive(Debug, Clone, PartialEq)]
pub struct FjxAttribute {
    /// The attribute name.
    pub name: FjxName,
    /// The attribute value.
    pub value: FjxAttributeValue,
    /// Source location.
    pub span: Span,
}

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum FjxAttributeValue {
    /// `"text"`
    String(StringLiteral),
    /// `42`
    Number {
        /// The literal as written.
        raw: EcoString,
        /// Source location.
        span: Span,
    },
    /// `true` / `false`
    Boolean {
        /// The value.
        value: bool,
        /// Source location.
        span: Span,
    },
    /// `null`
    Null {
        /// Source location.
        span: Span,
    },
    /// `@handler`
    Action(Identifier),
    /// `{expression}`
    Expression {
        /// The embedded expression.
        expression: Expression,
        /// Source location, including the braces.
        span: Span,
    },
}

impl FjxAttributeValue {
    /// Returns the span of this value.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::String(s) => s.span,
            Self::Action(id) => id.span,
            Self::Number { span, .. }
            | Self::Boolean { span, .. }
            | Self::Null { span }
            | Self::Expression { span, .. } => *span,
        }
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum FjxChild {
    /// A nested element.
    Element(FjxElement),
    /// A run of text. Runs made only of whitespace are not kept.
    Text {
        /// The text as written.
        text: EcoString,
        /// Source location.
        span: Span,
    },
    /// `{expression}`
    Expression {
        /// The embedded expression.
        expression: Expression,
        /// Source location, including the braces.
        span: Span,
    },
}

impl FjxChild {
    /// Returns the span of this child.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Element(element) => element.span,
            Self::Text { span, .. } | Self::Expression { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_only_same_kind_and_spelling() {
        let div = FjxName::Identifier(Identifier::new("div", Span::new(1, 4)));
        let other_div = FjxName::Identifier(Identifier::new("div", Span::new(10, 13)));
        let span = FjxName::Identifier(Identifier::new("span", Span::new(10, 14)));
        let action = FjxName::Action(Identifier::new("div", Span::new(10, 14)));
        assert!(div.matches(&other_div));
        assert!(!div.matches(&span));
        assert!(!div.matches(&action));
        assert_eq!(action.to_string(), "@div");
    }
}
