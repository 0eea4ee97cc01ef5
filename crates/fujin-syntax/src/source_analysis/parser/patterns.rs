// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Bracketed groups, destructuring patterns and parameter lists.
//!
//! `{…}` and `[…]` are parsed once into a [`Group`] before the parser
//! knows whether they are literals or patterns. The caller then converts
//! the group:
//!
//! - [`Parser::group_into_expression`] for object and array literals;
//! - [`Parser::group_into_pattern`] with [`PatternContext::Assignment`]
//!   when `=` follows;
//! - [`Parser::group_into_pattern`] with [`PatternContext::Binding`] for
//!   declarators, parameters and `catch` parameters.
//!
//! Each conversion reports the shapes its context does not allow.

use crate::ast::{
    Element, Expression, Identifier, ObjectMember, ObjectPatternProperty, Parameter, Pattern,
    PatternElement, PropertyKey,
};
use crate::source_analysis::{Span, TokenKind};

use super::Parser;

/// Where a pattern appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PatternContext {
    /// Declarators, parameters and `catch`: names and nested patterns only.
    Binding,
    /// The left side of `=`: members and subscripts are also targets.
    Assignment,
}

/// A bracketed group that is not yet an expression or a pattern.
#[derive(Debug)]
pub(super) enum Group {
    Object {
        entries: Vec<ObjectEntry>,
        span: Span,
    },
    Array {
        entries: Vec<ArrayEntry>,
        trailing_comma: bool,
        span: Span,
    },
    /// The nesting limit was hit; already reported.
    TooDeep { span: Span },
}

#[derive(Debug)]
pub(super) enum ObjectEntry {
    Pair {
        key: PropertyKey,
        value: GroupValue,
        span: Span,
    },
    Shorthand {
        name: Identifier,
        default: Option<Expression>,
        span: Span,
    },
    Spread {
        value: GroupValue,
        span: Span,
    },
    Hole(Span),
}

#[derive(Debug)]
pub(super) enum ArrayEntry {
    Item(GroupValue),
    Spread { value: GroupValue, span: Span },
    Hole(Span),
}

/// The value of a group entry: an expression, or a nested group kept
/// unconverted, optionally followed by `= default`.
#[derive(Debug)]
pub(super) enum GroupValue {
    Expression(Expression),
    Group {
        group: Box<Group>,
        default: Option<Expression>,
        span: Span,
    },
}

impl Group {
    const fn span(&self) -> Span {
        match self {
            Self::Object { span, .. } | Self::Array { span, .. } | Self::TooDeep { span } => *span,
        }
    }
}

impl GroupValue {
    fn has_default(&self) -> bool {
        match self {
            Self::Expression(Expression::Assignment { operator, .. }) => operator.is_plain(),
            Self::Group { default, .. } => default.is_some(),
            Self::Expression(_) => false,
        }
    }
}

impl Parser<'_> {
    // ========================================================================
    // Groups
    // ========================================================================

    pub(super) fn at_group_start(&mut self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::LeftBrace | TokenKind::LeftBracket
        )
    }

    /// Parses `{…}` or `[…]` into a [`Group`].
    pub(super) fn parse_group(&mut self) -> Group {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(too_deep) = self.enter_nesting() {
                return Group::TooDeep {
                    span: too_deep.span,
                };
            }
            let group = if self.check(TokenKind::LeftBrace) {
                self.parse_object_group()
            } else {
                self.parse_array_group()
            };
            self.leave_nesting();
            group
        })
    }

    fn parse_object_group(&mut self) -> Group {
        let start = self.advance().span();
        let entries = self.parse_delimited(TokenKind::RightBrace, Self::parse_object_entry);
        Group::Object {
            entries,
            span: self.span_from(start),
        }
    }

    fn parse_object_entry(&mut self) -> Option<ObjectEntry> {
        let token = self.current_token().clone();
        let start = token.span();
        match token.kind() {
            TokenKind::Comma => Some(ObjectEntry::Hole(start)),
            TokenKind::Ellipsis => {
                self.advance();
                let value = self.parse_group_value();
                Some(ObjectEntry::Spread {
                    value,
                    span: self.span_from(start),
                })
            }
            TokenKind::Identifier if self.peek_kind(1) != TokenKind::Colon => {
                self.advance();
                let name = Identifier::new(token.lexeme(), start);
                let default = self
                    .match_token(TokenKind::Equal)
                    .then(|| self.parse_assignment());
                Some(ObjectEntry::Shorthand {
                    name,
                    default,
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(keyword) if self.peek_kind(1) != TokenKind::Colon => {
                self.advance();
                self.reserved_word_error(keyword, start);
                None
            }
            _ => {
                let key = self.parse_property_key()?;
                self.expect(TokenKind::Colon, "`:`")?;
                let value = self.parse_group_value();
                Some(ObjectEntry::Pair {
                    key,
                    value,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn parse_array_group(&mut self) -> Group {
        let start = self.advance().span();
        let mut trailing_comma = false;
        let entries = self.parse_delimited(TokenKind::RightBracket, |parser| {
            let entry = parser.parse_array_entry();
            trailing_comma = parser.check(TokenKind::Comma)
                && parser.peek_kind(1) == TokenKind::RightBracket;
            Some(entry)
        });
        Group::Array {
            entries,
            trailing_comma,
            span: self.span_from(start),
        }
    }

    fn parse_array_entry(&mut self) -> ArrayEntry {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Comma => ArrayEntry::Hole(start),
            TokenKind::Ellipsis => {
                self.advance();
                let value = self.parse_group_value();
                ArrayEntry::Spread {
                    value,
                    span: self.span_from(start),
                }
            }
            _ => ArrayEntry::Item(self.parse_group_value()),
        }
    }

    /// An entry value. A nested group directly followed by `,`, a closer or
    /// `= default` is kept unconverted.
    fn parse_group_value(&mut self) -> GroupValue {
        if !self.at_group_start() {
            return GroupValue::Expression(self.parse_assignment());
        }
        let group = self.parse_group();
        let start = group.span();
        match self.current_kind() {
            TokenKind::Equal => {
                self.advance();
                let default = self.parse_assignment();
                GroupValue::Group {
                    group: Box::new(group),
                    default: Some(default),
                    span: self.span_from(start),
                }
            }
            TokenKind::Comma | TokenKind::RightBrace | TokenKind::RightBracket => {
                GroupValue::Group {
                    group: Box::new(group),
                    default: None,
                    span: start,
                }
            }
            _ => {
                let operand = self.group_into_expression(group);
                GroupValue::Expression(self.continue_expression(operand))
            }
        }
    }

    // ========================================================================
    // Groups as Expressions
    // ========================================================================

    /// Interprets a group as an object or array literal.
    pub(super) fn group_into_expression(&mut self, group: Group) -> Expression {
        match group {
            Group::Object { entries, span } => {
                let mut members = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Pair { key, value, span } => {
                            let value = self.value_into_expression(value);
                            members.push(ObjectMember::Property { key, value, span });
                        }
                        ObjectEntry::Shorthand {
                            name,
                            default,
                            span,
                        } => {
                            if default.is_some() {
                                self.error_at(
                                    span,
                                    "a shorthand property with a default is only valid in a destructuring pattern",
                                );
                            }
                            members.push(ObjectMember::Shorthand(name));
                        }
                        ObjectEntry::Spread { value, span } => {
                            let argument = self.value_into_expression(value);
                            members.push(ObjectMember::Spread { argument, span });
                        }
                        ObjectEntry::Hole(span) => {
                            self.error_at(span, "unexpected `,` in object literal");
                        }
                    }
                }
                Expression::Object { members, span }
            }
            Group::Array { entries, span, .. } => {
                let elements = entries
                    .into_iter()
                    .map(|entry| match entry {
                        ArrayEntry::Item(value) => Element::Item(self.value_into_expression(value)),
                        ArrayEntry::Spread { value, span } => Element::Spread {
                            argument: self.value_into_expression(value),
                            span,
                        },
                        ArrayEntry::Hole(span) => Element::Hole(span),
                    })
                    .collect();
                Expression::Array { elements, span }
            }
            Group::TooDeep { span } => Expression::Error {
                message: super::TooDeep::MESSAGE.into(),
                span,
            },
        }
    }

    fn value_into_expression(&mut self, value: GroupValue) -> Expression {
        match value {
            GroupValue::Expression(expression) => expression,
            GroupValue::Group {
                group,
                default: None,
                ..
            } => self.group_into_expression(*group),
            GroupValue::Group {
                group,
                default: Some(default),
                span,
            } => {
                let target = self.group_into_pattern(*group, PatternContext::Assignment);
                Expression::Assignment {
                    operator: crate::ast::AssignmentOperator::Assign,
                    target: Box::new(target),
                    value: Box::new(default),
                    span,
                }
            }
        }
    }

    // ========================================================================
    // Groups as Patterns
    // ========================================================================

    /// Interprets a group as a destructuring pattern.
    pub(super) fn group_into_pattern(&mut self, group: Group, context: PatternContext) -> Pattern {
        match group {
            Group::Object { entries, span } => {
                let mut properties = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry {
                        ObjectEntry::Pair { key, value, span } => {
                            let value = self.value_into_pattern(value, context);
                            properties.push(ObjectPatternProperty::Pair { key, value, span });
                        }
                        ObjectEntry::Shorthand {
                            name,
                            default,
                            span,
                        } => properties.push(ObjectPatternProperty::Shorthand {
                            name,
                            default,
                            span,
                        }),
                        ObjectEntry::Spread { span, .. } => {
                            self.error_at(span, "rest properties are not allowed in object patterns");
                        }
                        ObjectEntry::Hole(span) => {
                            self.error_at(span, "unexpected `,` in object pattern");
                        }
                    }
                }
                Pattern::Object { properties, span }
            }
            Group::Array {
                entries,
                trailing_comma,
                span,
            } => {
                let count = entries.len();
                let mut elements = Vec::with_capacity(count);
                for (index, entry) in entries.into_iter().enumerate() {
                    match entry {
                        ArrayEntry::Item(value) => {
                            elements.push(PatternElement::Item(self.value_into_pattern(value, context)));
                        }
                        ArrayEntry::Spread { value, span } => {
                            if index + 1 != count || trailing_comma {
                                self.error_at(span, "a rest element must be last in an array pattern");
                            }
                            if value.has_default() {
                                self.error_at(span, "a rest element cannot have a default");
                            }
                            let pattern = self.value_into_pattern(value, context);
                            elements.push(PatternElement::Rest { pattern, span });
                        }
                        ArrayEntry::Hole(span) => elements.push(PatternElement::Hole(span)),
                    }
                }
                Pattern::Array { elements, span }
            }
            Group::TooDeep { span } => Pattern::Error {
                message: super::TooDeep::MESSAGE.into(),
                span,
            },
        }
    }

    fn value_into_pattern(&mut self, value: GroupValue, context: PatternContext) -> Pattern {
        match value {
            GroupValue::Expression(expression) => self.expression_into_pattern(expression, context),
            GroupValue::Group {
                group,
                default,
                span,
            } => {
                let target = self.group_into_pattern(*group, context);
                match default {
                    Some(default) => Pattern::Assignment {
                        target: Box::new(target),
                        default: Box::new(default),
                        span,
                    },
                    None => target,
                }
            }
        }
    }

    /// Interprets an already parsed expression as a pattern element.
    pub(super) fn expression_into_pattern(
        &mut self,
        expression: Expression,
        context: PatternContext,
    ) -> Pattern {
        let assignment = context == PatternContext::Assignment;
        match expression {
            Expression::Identifier(id) => Pattern::Identifier(id),
            Expression::Assignment {
                operator,
                target,
                value,
                span,
            } if operator.is_plain() => {
                let target = match context {
                    PatternContext::Binding => self.into_binding(*target),
                    PatternContext::Assignment => *target,
                };
                Pattern::Assignment {
                    target: Box::new(target),
                    default: value,
                    span,
                }
            }
            Expression::Member { .. } | Expression::Subscript { .. } if assignment => {
                Pattern::Expression(Box::new(expression))
            }
            Expression::Parenthesized { .. }
                if assignment
                    && matches!(
                        expression.unparenthesized(),
                        Expression::Identifier(_)
                            | Expression::Member { .. }
                            | Expression::Subscript { .. }
                    ) =>
            {
                Pattern::Expression(Box::new(expression))
            }
            Expression::Error { message, span } => Pattern::Error { message, span },
            other => {
                let span = other.span();
                let message = if assignment {
                    "invalid assignment target"
                } else {
                    "invalid binding target: expected a name or a destructuring pattern"
                };
                self.error_at(span, message);
                Pattern::Error {
                    message: message.into(),
                    span,
                }
            }
        }
    }

    /// Replaces member and subscript targets, valid only in assignments,
    /// with reported error nodes.
    fn into_binding(&mut self, pattern: Pattern) -> Pattern {
        match pattern {
            Pattern::Expression(expression) => {
                let span = expression.span();
                let message = "invalid binding target: expected a name or a destructuring pattern";
                self.error_at(span, message);
                Pattern::Error {
                    message: message.into(),
                    span,
                }
            }
            Pattern::Object { properties, span } => Pattern::Object {
                properties: properties
                    .into_iter()
                    .map(|property| match property {
                        ObjectPatternProperty::Pair { key, value, span } => {
                            ObjectPatternProperty::Pair {
                                key,
                                value: self.into_binding(value),
                                span,
                            }
                        }
                        shorthand @ ObjectPatternProperty::Shorthand { .. } => shorthand,
                    })
                    .collect(),
                span,
            },
            Pattern::Array { elements, span } => Pattern::Array {
                elements: elements
                    .into_iter()
                    .map(|element| match element {
                        PatternElement::Item(pattern) => {
                            PatternElement::Item(self.into_binding(pattern))
                        }
                        PatternElement::Rest { pattern, span } => PatternElement::Rest {
                            pattern: self.into_binding(pattern),
                            span,
                        },
                        hole @ PatternElement::Hole(_) => hole,
                    })
                    .collect(),
                span,
            },
            Pattern::Assignment {
                target,
                default,
                span,
            } => Pattern::Assignment {
                target: Box::new(self.into_binding(*target)),
                default,
                span,
            },
            other @ (Pattern::Identifier(_) | Pattern::Error { .. }) => other,
        }
    }

    /// The target of a compound assignment or update: a name, member or
    /// subscript.
    pub(super) fn simple_target(&mut self, expression: Expression, what: &str) -> Pattern {
        let valid = matches!(
            expression.unparenthesized(),
            Expression::Identifier(_) | Expression::Member { .. } | Expression::Subscript { .. }
        );
        match expression {
            Expression::Identifier(id) => Pattern::Identifier(id),
            Expression::Error { message, span } => Pattern::Error { message, span },
            expression if valid => Pattern::Expression(Box::new(expression)),
            expression => {
                let span = expression.span();
                let message = ecow::eco_format!("invalid {what} target");
                self.error_at(span, message.clone());
                Pattern::Error { message, span }
            }
        }
    }

    // ========================================================================
    // Binding Patterns and Parameters
    // ========================================================================

    /// Parses a binding target: a name or a destructuring pattern.
    pub(super) fn parse_binding_pattern(&mut self) -> Pattern {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier => {
                self.advance();
                Pattern::Identifier(Identifier::new(token.lexeme(), token.span()))
            }
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                let group = self.parse_group();
                self.group_into_pattern(group, PatternContext::Binding)
            }
            TokenKind::Keyword(keyword) => {
                self.advance();
                self.reserved_word_error(keyword, token.span());
                Pattern::Error {
                    message: "reserved word".into(),
                    span: token.span(),
                }
            }
            _ => {
                self.error_expected("a name or destructuring pattern");
                Pattern::Error {
                    message: "expected a name or destructuring pattern".into(),
                    span: self.missing_span(),
                }
            }
        }
    }

    /// `(a, b: T, c = 1, ...rest)`
    pub(super) fn parse_formal_parameters(&mut self) -> Vec<Parameter> {
        if self.expect(TokenKind::LeftParen, "`(`").is_none() {
            return Vec::new();
        }
        let parameters = self.parse_delimited(TokenKind::RightParen, |parser| {
            Some(parser.parse_parameter())
        });
        let last = parameters.len().saturating_sub(1);
        for parameter in &parameters[..last] {
            if parameter.rest {
                self.error_at(parameter.span, "a rest parameter must be last");
            }
        }
        parameters
    }

    fn parse_parameter(&mut self) -> Parameter {
        let start = self.current_span();
        let rest = self.match_token(TokenKind::Ellipsis);
        let pattern = self.parse_binding_pattern();
        let type_annotation = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());
        let default = if self.check(TokenKind::Equal) {
            let equal = self.advance().span();
            if rest {
                self.error_at(equal, "a rest parameter cannot have a default");
            }
            Some(self.parse_assignment())
        } else {
            None
        };
        let span = self.span_from(start).merge(pattern.span());
        Parameter {
            pattern,
            type_annotation,
            default,
            rest,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_full_err, parse_full_ok, parse_ok};
    use crate::ast::{Declaration, Program, Statement, Type};

    use super::*;

    fn first_declarator_target(program: &Program) -> &Pattern {
        match &program.statements[0] {
            Statement::Declaration(Declaration::Lexical(decl)) => &decl.declarators[0].target,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    fn first_expression(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::Expression { expression, .. } => expression,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn object_pattern_with_type_annotation() {
        let program = parse_ok("let {a, b}: T = x;");
        let Statement::Declaration(Declaration::Lexical(decl)) = &program.statements[0] else {
            panic!("expected declaration");
        };
        let declarator = &decl.declarators[0];
        assert!(matches!(&declarator.target, Pattern::Object { properties, .. } if properties.len() == 2));
        assert!(matches!(
            &declarator.type_annotation,
            Some(Type::Reference { name, .. }) if name.name == "T"
        ));
    }

    #[test]
    fn nested_binding_pattern_with_defaults() {
        let program = parse_ok("let {a: [b, , c = 1, ...d], e = 2} = x;");
        let mut names = Vec::new();
        first_declarator_target(&program).for_each_binding(&mut |id| names.push(id.name.clone()));
        assert_eq!(names, ["b", "c", "d", "e"]);
    }

    #[test]
    fn object_literal_members() {
        let program = parse_ok("x = {a, b: 1, \"c\": 2, 3: 4, @go: 5, emit: 6, ...rest};");
        match first_expression(&program) {
            Expression::Assignment { value, .. } => match &**value {
                Expression::Object { members, .. } => assert_eq!(members.len(), 7),
                other => panic!("expected object, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_with_holes_and_spread() {
        let program = parse_ok("x = [1, , ...y,];");
        match first_expression(&program) {
            Expression::Assignment { value, .. } => match &**value {
                Expression::Array { elements, .. } => {
                    assert_eq!(elements.len(), 3);
                    assert!(matches!(elements[1], Element::Hole(_)));
                    assert!(matches!(elements[2], Element::Spread { .. }));
                }
                other => panic!("expected array, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn destructuring_assignment() {
        let program = parse_ok("[a, b.c, {d = 1}] = [1, 2, {}];");
        match first_expression(&program) {
            Expression::Assignment { target, .. } => match &**target {
                Pattern::Array { elements, .. } => {
                    assert!(matches!(elements[1], PatternElement::Item(Pattern::Expression(_))));
                    assert!(matches!(elements[2], PatternElement::Item(Pattern::Object { .. })));
                }
                other => panic!("expected array pattern, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn nested_group_with_default_in_assignment() {
        let program = parse_ok("[{a} = {}, [b] = []] = x;");
        match first_expression(&program) {
            Expression::Assignment { target, .. } => match &**target {
                Pattern::Array { elements, .. } => {
                    assert!(matches!(
                        elements[0],
                        PatternElement::Item(Pattern::Assignment { .. })
                    ));
                }
                other => panic!("expected array pattern, got {other:?}"),
            },
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn group_used_as_operand() {
        let program = parse_ok("x = [1, 2].length + {a: 1}.a;");
        assert!(matches!(
            first_expression(&program),
            Expression::Assignment { .. }
        ));
    }

    #[test]
    fn shorthand_default_outside_pattern() {
        let diagnostics = parse_err("x = {a = 1};");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:#?}");
        assert!(diagnostics[0].message.contains("only valid in a destructuring pattern"));
    }

    #[test]
    fn rest_must_be_last() {
        let diagnostics = parse_err("let [...a, b] = x;");
        assert!(diagnostics[0].message.contains("must be last"));
        let diagnostics = parse_err("let [...a,] = x;");
        assert!(diagnostics[0].message.contains("must be last"));
    }

    #[test]
    fn object_pattern_rejects_rest() {
        let diagnostics = parse_err("let {...a} = x;");
        assert!(diagnostics[0].message.contains("not allowed in object patterns"));
    }

    #[test]
    fn binding_pattern_rejects_members() {
        let diagnostics = parse_err("let [a.b] = x;");
        assert!(diagnostics[0].message.contains("invalid binding target"));
        let diagnostics = parse_err("let [a.b = 1] = x;");
        assert!(diagnostics[0].message.contains("invalid binding target"));
    }

    #[test]
    fn object_holes_are_rejected() {
        let diagnostics = parse_err("x = {a,, b};");
        assert!(diagnostics[0].message.contains("unexpected `,`"));
    }

    #[test]
    fn parameters_with_defaults_and_rest() {
        let program = parse_full_ok("function f(a, {b} = {}, [c]: number[], ...d) {}");
        let Statement::Declaration(Declaration::Function(function)) = &program.statements[0] else {
            panic!("expected function");
        };
        assert_eq!(function.parameters.len(), 4);
        assert!(function.parameters[1].default.is_some());
        assert!(function.parameters[2].type_annotation.is_some());
        assert!(function.parameters[3].rest);
    }

    #[test]
    fn rest_parameter_must_be_last() {
        let diagnostics = parse_full_err("function f(...a, b) {}");
        assert!(diagnostics[0].message.contains("rest parameter must be last"));
    }

    #[test]
    fn parenthesized_member_is_an_assignment_target() {
        let program = parse_ok("(a.b) = 1;");
        match first_expression(&program) {
            Expression::Assignment { target, .. } => {
                assert!(matches!(**target, Pattern::Expression(_)));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }
}
