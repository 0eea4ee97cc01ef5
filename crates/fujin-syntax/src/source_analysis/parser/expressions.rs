// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Binary operators go through a Pratt loop driven by
//! [`binary_operator`]. Assignment chains are folded iteratively; the
//! conditional operator is folded inside the Pratt loop. Parenthesized
//! arrow parameter lists are recognized by a checkpointed speculative
//! parse.

use crate::ast::{
    ArrowBody, ArrowFunction, AssignmentOperator, BinaryOperator, Element, Expression, Identifier,
    Parameter, Pattern, TemplateLiteral, TemplatePart, TypeParameter, UnaryOperator,
    UpdateOperator,
};
use crate::source_analysis::{Keyword, Span, TokenKind};

use super::patterns::PatternContext;
use super::{CONDITIONAL, Parser, action_name, binary_operator, is_actor_operator};

/// Binding power of prefix operators: tighter than every binary operator.
const PREFIX: u8 = 150;

impl Parser<'_> {
    // ========================================================================
    // Entry Points
    // ========================================================================

    /// Parses an expression, including the comma operator.
    pub(super) fn parse_expression(&mut self) -> Expression {
        let first = self.parse_assignment();
        if !self.check(TokenKind::Comma) {
            return first;
        }
        let comma = self.current_span();
        if !self.dialect().has_full_operators() {
            self.unavailable(comma, "the comma operator");
        }
        let mut expressions = vec![first];
        while self.match_token(TokenKind::Comma) {
            expressions.push(self.parse_assignment());
        }
        let span = expressions[0]
            .span()
            .merge(expressions[expressions.len() - 1].span());
        Expression::Sequence { expressions, span }
    }

    /// Parses an assignment-level expression: everything but the comma
    /// operator.
    pub(super) fn parse_assignment(&mut self) -> Expression {
        self.parse_assignment_from(None)
    }

    /// Continues an assignment-level expression whose first operand has
    /// already been parsed (a bracketed group that turned out not to be a
    /// pattern).
    pub(super) fn continue_expression(&mut self, operand: Expression) -> Expression {
        self.parse_assignment_from(Some(operand))
    }

    /// `a = b = c` is right-associative; the chain is collected in a loop
    /// and folded from the right.
    fn parse_assignment_from(&mut self, mut operand: Option<Expression>) -> Expression {
        let mut targets: Vec<(Pattern, AssignmentOperator)> = Vec::new();
        let mut value = loop {
            let left = if let Some(operand) = operand.take() {
                self.continue_binary(operand)
            } else if self.at_group_start() {
                let group = self.parse_group();
                if self.match_token(TokenKind::Equal) {
                    let target = self.group_into_pattern(group, PatternContext::Assignment);
                    targets.push((target, AssignmentOperator::Assign));
                    continue;
                }
                let operand = self.group_into_expression(group);
                self.continue_binary(operand)
            } else {
                self.parse_binary(0)
            };

            let kind = self.current_kind();
            let Some(operator) = assignment_operator(kind) else {
                break left;
            };
            let span = self.current_span();
            self.advance();
            if !self.dialect().has_full_operators() && !is_actor_assignment(operator) {
                self.unavailable(span, &format!("operator `{operator}`"));
            }
            let target = if operator.is_plain() {
                self.expression_into_pattern(left, PatternContext::Assignment)
            } else {
                self.simple_target(left, "assignment")
            };
            targets.push((target, operator));
        };

        while let Some((target, operator)) = targets.pop() {
            let span = target.span().merge(value.span());
            value = Expression::Assignment {
                operator,
                target: Box::new(target),
                value: Box::new(value),
                span,
            };
        }
        value
    }

    fn continue_binary(&mut self, operand: Expression) -> Expression {
        let operand = self.parse_postfix(operand);
        self.parse_binary_rest(operand, 0)
    }

    // ========================================================================
    // Pratt Loop
    // ========================================================================

    /// Parses a binary expression whose operators bind at least as tightly
    /// as `min_bp`.
    fn parse_binary(&mut self, min_bp: u8) -> Expression {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(too_deep) = self.enter_nesting() {
                return too_deep.expression();
            }
            let operand = self.parse_unary();
            let result = self.parse_binary_rest(operand, min_bp);
            self.leave_nesting();
            result
        })
    }

    fn parse_binary_rest(&mut self, mut left: Expression, min_bp: u8) -> Expression {
        loop {
            let kind = self.current_kind();
            if kind == TokenKind::Question {
                if CONDITIONAL.left < min_bp {
                    break;
                }
                left = self.parse_conditional(left);
                continue;
            }

            let Some((operator, bp)) = binary_operator(kind) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let operator_span = self.current_span();
            self.advance();
            if !self.dialect().has_full_operators() && !is_actor_operator(operator) {
                self.unavailable(operator_span, &format!("operator `{operator}`"));
            }

            let right = self.parse_binary(bp.right);
            let span = left.span().merge(right.span());
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    /// `test ? consequent : alternate`
    fn parse_conditional(&mut self, test: Expression) -> Expression {
        let question = self.advance().span();
        if !self.dialect().has_full_operators() {
            self.unavailable(question, "the conditional operator `?:`");
        }
        let consequent = self.parse_assignment();
        let alternate = if self.expect(TokenKind::Colon, "`:`").is_some() {
            self.parse_assignment()
        } else {
            Expression::Error {
                message: "expected `:`".into(),
                span: self.missing_span(),
            }
        };
        let span = test.span().merge(alternate.span());
        Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span,
        }
    }

    // ========================================================================
    // Unary and Postfix
    // ========================================================================

    fn parse_unary(&mut self) -> Expression {
        let token = self.current_token().clone();
        let start = token.span();
        let operator = match token.kind() {
            TokenKind::Bang => Some(UnaryOperator::Not),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Tilde => Some(UnaryOperator::BitwiseNot),
            _ => None,
        };
        if let Some(operator) = operator {
            self.advance();
            if operator == UnaryOperator::BitwiseNot && !self.dialect().has_full_operators() {
                self.unavailable(start, "operator `~`");
            }
            let operand = self.parse_binary(PREFIX);
            return Expression::Unary {
                operator,
                span: start.merge(operand.span()),
                operand: Box::new(operand),
            };
        }

        match token.kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.advance();
                let operator = update_operator(token.kind());
                let operand = self.parse_binary(PREFIX);
                let span = start.merge(operand.span());
                let operand = self.checked_update_operand(operand);
                Expression::Update {
                    operator,
                    prefix: true,
                    operand: Box::new(operand),
                    span,
                }
            }
            TokenKind::Keyword(Keyword::Await) => {
                self.advance();
                let argument = self.parse_binary(PREFIX);
                Expression::Await {
                    span: start.merge(argument.span()),
                    argument: Box::new(argument),
                }
            }
            _ => {
                let primary = self.parse_primary();
                self.parse_postfix(primary)
            }
        }
    }

    /// Member access, subscripts, calls, tagged templates and a trailing
    /// postfix update.
    fn parse_postfix(&mut self, mut expression: Expression) -> Expression {
        if expression.is_error() {
            return expression;
        }
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    expression = self.finish_member(expression, false);
                }
                TokenKind::QuestionDot => {
                    let span = self.advance().span();
                    if !self.dialect().has_full_operators() {
                        self.unavailable(span, "optional chaining `?.`");
                    }
                    expression = match self.current_kind() {
                        TokenKind::LeftParen => self.finish_call(expression, true),
                        TokenKind::LeftBracket => self.finish_subscript(expression, true),
                        _ => self.finish_member(expression, true),
                    };
                }
                TokenKind::LeftBracket => expression = self.finish_subscript(expression, false),
                TokenKind::LeftParen => expression = self.finish_call(expression, false),
                TokenKind::TemplateStart => {
                    let template = self.parse_template_literal();
                    let span = expression.span().merge(template.span);
                    expression = Expression::TaggedTemplate {
                        tag: Box::new(expression),
                        template,
                        span,
                    };
                }
                _ => break,
            }
            if expression.is_error() {
                return expression;
            }
        }

        let kind = self.current_kind();
        if matches!(kind, TokenKind::PlusPlus | TokenKind::MinusMinus) && !self.at_new_line() {
            let end = self.advance().span();
            let span = expression.span().merge(end);
            let operand = self.checked_update_operand(expression);
            return Expression::Update {
                operator: update_operator(kind),
                prefix: false,
                operand: Box::new(operand),
                span,
            };
        }
        expression
    }

    /// `object.name`; reserved words are valid property names.
    fn finish_member(&mut self, object: Expression, optional: bool) -> Expression {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                self.advance();
                let property = Identifier::new(token.lexeme(), token.span());
                Expression::Member {
                    span: object.span().merge(property.span),
                    object: Box::new(object),
                    property,
                    optional,
                }
            }
            _ => {
                self.error_expected("property name");
                Expression::Error {
                    message: "expected property name".into(),
                    span: self.span_from(object.span()),
                }
            }
        }
    }

    fn finish_subscript(&mut self, object: Expression, optional: bool) -> Expression {
        self.advance();
        let index = self.parse_expression();
        self.expect(TokenKind::RightBracket, "`]`");
        Expression::Subscript {
            span: self.span_from(object.span()),
            object: Box::new(object),
            index: Box::new(index),
            optional,
        }
    }

    fn finish_call(&mut self, callee: Expression, optional: bool) -> Expression {
        let arguments = self.parse_arguments();
        Expression::Call {
            span: self.span_from(callee.span()),
            callee: Box::new(callee),
            arguments,
            optional,
        }
    }

    /// `(a, ...b,)`
    fn parse_arguments(&mut self) -> Vec<Element> {
        self.advance();
        self.parse_delimited(TokenKind::RightParen, |parser| Some(parser.parse_element()))
    }

    /// An argument or array element: an expression or `...spread`.
    pub(super) fn parse_element(&mut self) -> Element {
        if self.check(TokenKind::Ellipsis) {
            let start = self.advance().span();
            let argument = self.parse_assignment();
            return Element::Spread {
                span: start.merge(argument.span()),
                argument,
            };
        }
        Element::Item(self.parse_assignment())
    }

    fn checked_update_operand(&mut self, operand: Expression) -> Expression {
        match operand.unparenthesized() {
            Expression::Identifier(_)
            | Expression::Member { .. }
            | Expression::Subscript { .. }
            | Expression::Error { .. } => operand,
            _ => {
                let span = operand.span();
                self.error_at(span, "invalid operand for `++`/`--`");
                Expression::Error {
                    message: "invalid update operand".into(),
                    span,
                }
            }
        }
    }

    // ========================================================================
    // Primary Expressions
    // ========================================================================

    fn parse_primary(&mut self) -> Expression {
        let token = self.current_token().clone();
        let span = token.span();
        match token.kind() {
            TokenKind::Identifier => {
                self.advance();
                let name = Identifier::new(token.lexeme(), span);
                if self.dialect().has_functions() && self.check(TokenKind::Arrow) {
                    let parameters = vec![simple_parameter(name)];
                    return self.finish_arrow(span, false, Vec::new(), parameters, None);
                }
                Expression::Identifier(name)
            }
            TokenKind::ActionIdentifier => {
                self.advance();
                Expression::ActionIdentifier(action_name(&token))
            }
            TokenKind::At => {
                self.advance();
                Expression::Meta { span }
            }
            TokenKind::Number => {
                self.advance();
                Expression::Number {
                    raw: token.lexeme().into(),
                    span,
                }
            }
            TokenKind::StringStart => match self.parse_string_literal() {
                Some(literal) => Expression::String(literal),
                None => self.expression_error("expected string"),
            },
            TokenKind::TemplateStart => Expression::Template(self.parse_template_literal()),
            TokenKind::RegexPattern => self.parse_regex(),
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.advance();
                Expression::Boolean {
                    value: token.is_keyword(Keyword::True),
                    span,
                }
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Expression::Null { span }
            }
            TokenKind::LeftParen => self.parse_parenthesized_or_arrow(),
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                let group = self.parse_group();
                self.group_into_expression(group)
            }
            TokenKind::Less if self.dialect().has_fjx() => {
                Expression::Fjx(Box::new(self.parse_fjx_element()))
            }
            TokenKind::Less if self.dialect().has_functions() => self.parse_generic_arrow(),
            TokenKind::Keyword(Keyword::Function) => {
                self.advance();
                Expression::Function(Box::new(self.parse_function_rest(span, false, false)))
            }
            TokenKind::Keyword(Keyword::Async) => self.parse_async_expression(),
            TokenKind::Keyword(keyword) => {
                self.advance();
                self.reserved_word_error(keyword, span);
                Expression::Error {
                    message: "reserved word".into(),
                    span,
                }
            }
            kind => {
                self.error_expected("expression");
                if !ends_expression(kind) {
                    self.advance();
                    return Expression::Error {
                        message: "expected expression".into(),
                        span,
                    };
                }
                self.expression_error("expected expression")
            }
        }
    }

    /// An error node for a missing expression, consuming nothing.
    fn expression_error(&self, message: &str) -> Expression {
        Expression::Error {
            message: message.into(),
            span: self.missing_span(),
        }
    }

    fn parse_parenthesized_or_arrow(&mut self) -> Expression {
        let start = self.current_span();
        if self.dialect().has_functions()
            && self.paren_group_followed_by(|kind| {
                matches!(kind, TokenKind::Arrow | TokenKind::Colon)
            })
            && let Some(arrow) = self.try_parse_arrow(start, false, Vec::new())
        {
            return arrow;
        }
        self.parse_parenthesized()
    }

    fn parse_parenthesized(&mut self) -> Expression {
        let start = self.advance().span();
        let expression = self.parse_expression();
        self.expect(TokenKind::RightParen, "`)`");
        Expression::Parenthesized {
            expression: Box::new(expression),
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Arrow Functions
    // ========================================================================

    /// Speculatively parses `(params) [: Type] =>`. On failure the stream is
    /// rolled back, the diagnostics raised along the way are discarded, and
    /// `None` is returned.
    fn try_parse_arrow(
        &mut self,
        start: Span,
        is_async: bool,
        type_parameters: Vec<TypeParameter>,
    ) -> Option<Expression> {
        tracing::trace!(offset = start.start(), "trying arrow function");
        let checkpoint = self.stream.checkpoint();
        let last_expected_at = self.last_expected_at;
        self.reporter.begin_speculation();

        let parameters = self.parse_formal_parameters();
        let return_type = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());

        if self.check(TokenKind::Arrow) && !self.reporter.speculation_failed() {
            self.reporter.commit_speculation();
            let arrow =
                self.finish_arrow(start, is_async, type_parameters, parameters, return_type);
            return Some(arrow);
        }

        tracing::trace!(offset = start.start(), "not an arrow function");
        self.reporter.discard_speculation();
        self.stream.rollback(checkpoint);
        self.last_expected_at = last_expected_at;
        None
    }

    /// Parses `=> body` once the parameters are known.
    fn finish_arrow(
        &mut self,
        start: Span,
        is_async: bool,
        type_parameters: Vec<TypeParameter>,
        parameters: Vec<Parameter>,
        return_type: Option<crate::ast::Type>,
    ) -> Expression {
        self.expect(TokenKind::Arrow, "`=>`");
        let body = if self.check(TokenKind::LeftBrace) {
            ArrowBody::Block(self.parse_block())
        } else {
            ArrowBody::Expression(Box::new(self.parse_assignment()))
        };
        Expression::Arrow(Box::new(ArrowFunction {
            is_async,
            type_parameters,
            parameters,
            return_type,
            span: start.merge(body.span()),
            body,
        }))
    }

    /// `<T>(x: T) => x`
    fn parse_generic_arrow(&mut self) -> Expression {
        let start = self.current_span();
        let type_parameters = self.parse_type_parameters();
        if self.check(TokenKind::LeftParen)
            && let Some(arrow) = self.try_parse_arrow(start, false, type_parameters)
        {
            return arrow;
        }
        self.error_expected("arrow function parameters");
        Expression::Error {
            message: "expected arrow function".into(),
            span: self.span_from(start),
        }
    }

    /// `async function`, `async x => …` and `async (…) => …`.
    fn parse_async_expression(&mut self) -> Expression {
        let start = self.advance().span();
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Function) => {
                self.advance();
                Expression::Function(Box::new(self.parse_function_rest(start, true, false)))
            }
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::Arrow => {
                let token = self.advance();
                let name = Identifier::new(token.lexeme(), token.span());
                self.finish_arrow(start, true, Vec::new(), vec![simple_parameter(name)], None)
            }
            TokenKind::LeftParen => {
                if let Some(arrow) = self.try_parse_arrow(start, true, Vec::new()) {
                    return arrow;
                }
                self.reserved_word_error(Keyword::Async, start);
                self.skip_balanced();
                Expression::Error {
                    message: "expected arrow function".into(),
                    span: self.span_from(start),
                }
            }
            _ => {
                self.reserved_word_error(Keyword::Async, start);
                Expression::Error {
                    message: "reserved word".into(),
                    span: start,
                }
            }
        }
    }

    // ========================================================================
    // Templates and Regular Expressions
    // ========================================================================

    /// `` `text ${expr} text` ``; escapes are kept raw.
    pub(super) fn parse_template_literal(&mut self) -> TemplateLiteral {
        let start = self.advance().span();
        let mut parts = Vec::new();
        let mut text: Option<Span> = None;
        loop {
            let token = self.current_token().clone();
            match token.kind() {
                TokenKind::TemplateChars | TokenKind::EscapeSequence => {
                    self.advance();
                    text = Some(text.map_or(token.span(), |span| span.merge(token.span())));
                }
                TokenKind::TemplateSubstitutionStart => {
                    self.flush_template_text(&mut text, &mut parts);
                    self.advance();
                    let expression = self.parse_expression();
                    if !self.match_token(TokenKind::TemplateSubstitutionEnd) {
                        self.error_expected("`}`");
                        self.skip_to_substitution_end();
                    }
                    parts.push(TemplatePart::Substitution {
                        expression,
                        span: self.span_from(token.span()),
                    });
                }
                TokenKind::TemplateEnd => {
                    self.flush_template_text(&mut text, &mut parts);
                    self.advance();
                    break;
                }
                _ => {
                    self.flush_template_text(&mut text, &mut parts);
                    break;
                }
            }
        }
        TemplateLiteral {
            parts,
            span: self.span_from(start),
        }
    }

    fn flush_template_text(&self, text: &mut Option<Span>, parts: &mut Vec<TemplatePart>) {
        if let Some(span) = text.take() {
            parts.push(TemplatePart::Text {
                raw: self.raw_text(span),
                span,
            });
        }
    }

    fn skip_to_substitution_end(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::TemplateSubstitutionEnd => {
                    self.advance();
                    return;
                }
                TokenKind::TemplateEnd | TokenKind::Eof => return,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    self.skip_balanced();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// `/pattern/flags`
    fn parse_regex(&mut self) -> Expression {
        let token = self.advance();
        let lexeme = token.lexeme();
        let pattern = lexeme
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .unwrap_or(lexeme);
        let mut span = token.span();
        let mut flags = ecow::EcoString::new();
        if self.check(TokenKind::RegexFlags) {
            let flag_token = self.advance();
            flags = flag_token.lexeme().into();
            span = span.merge(flag_token.span());
        }
        Expression::Regex {
            pattern: pattern.into(),
            flags,
            span,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Tokens that end an expression; a missing operand in front of one of
/// these is reported without consuming it.
const fn ends_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::Semicolon
            | TokenKind::AutomaticSemicolon
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Arrow
            | TokenKind::TemplateSubstitutionEnd
            | TokenKind::TemplateEnd
            | TokenKind::Eof
    )
}

const fn update_operator(kind: TokenKind) -> UpdateOperator {
    if matches!(kind, TokenKind::PlusPlus) {
        UpdateOperator::Increment
    } else {
        UpdateOperator::Decrement
    }
}

/// Maps an assignment token to its operator.
const fn assignment_operator(kind: TokenKind) -> Option<AssignmentOperator> {
    use BinaryOperator as Op;
    let op = match kind {
        TokenKind::Equal => return Some(AssignmentOperator::Assign),
        TokenKind::PlusEqual => Op::Add,
        TokenKind::MinusEqual => Op::Subtract,
        TokenKind::StarEqual => Op::Multiply,
        TokenKind::SlashEqual => Op::Divide,
        TokenKind::PercentEqual => Op::Remainder,
        TokenKind::StarStarEqual => Op::Exponent,
        TokenKind::LessLessEqual => Op::ShiftLeft,
        TokenKind::GreaterGreaterEqual => Op::ShiftRight,
        TokenKind::GreaterGreaterGreaterEqual => Op::UnsignedShiftRight,
        TokenKind::AmpEqual => Op::BitwiseAnd,
        TokenKind::CaretEqual => Op::BitwiseXor,
        TokenKind::PipeEqual => Op::BitwiseOr,
        TokenKind::AmpAmpEqual => Op::LogicalAnd,
        TokenKind::PipePipeEqual => Op::LogicalOr,
        TokenKind::QuestionQuestionEqual => Op::Nullish,
        _ => return None,
    };
    Some(AssignmentOperator::Compound(op))
}

/// Assignment operators the actor dialect defines.
const fn is_actor_assignment(operator: AssignmentOperator) -> bool {
    use BinaryOperator as Op;
    matches!(
        operator,
        AssignmentOperator::Assign
            | AssignmentOperator::Compound(
                Op::Add | Op::Subtract | Op::Multiply | Op::Divide | Op::Remainder
            )
    )
}

/// A parameter that is just a name, as in `x => x`.
fn simple_parameter(name: Identifier) -> Parameter {
    Parameter {
        span: name.span,
        pattern: Pattern::Identifier(name),
        type_annotation: None,
        default: None,
        rest: false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_full_err, parse_full_ok, parse_ok};
    use crate::ast::{Declaration, Program, Statement};

    use super::*;

    /// The expression of the first statement.
    fn first_expression(program: &Program) -> &Expression {
        match &program.statements[0] {
            Statement::Expression { expression, .. } => expression,
            Statement::Declaration(Declaration::Lexical(decl)) => {
                decl.declarators[0].init.as_ref().unwrap()
            }
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn binary(expression: &Expression) -> (BinaryOperator, &Expression, &Expression) {
        match expression {
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => (*operator, left, right),
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn precedence_multiplication_over_addition() {
        let program = parse_ok("1 + 2 * 3;");
        let (op, left, right) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(left, Expression::Number { .. }));
        assert_eq!(binary(right).0, BinaryOperator::Multiply);
    }

    #[test]
    fn subtraction_is_left_associative() {
        let program = parse_ok("a - b - c;");
        let (op, left, _) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::Subtract);
        assert_eq!(binary(left).0, BinaryOperator::Subtract);
    }

    #[test]
    fn exponent_is_right_associative() {
        let program = parse_full_ok("a ** b ** c;");
        let (op, left, right) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::Exponent);
        assert!(matches!(left, Expression::Identifier(_)));
        assert_eq!(binary(right).0, BinaryOperator::Exponent);
    }

    #[test]
    fn logical_and_binds_tighter_than_or() {
        let program = parse_ok("a || b && c;");
        let (op, _, right) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::LogicalOr);
        assert_eq!(binary(right).0, BinaryOperator::LogicalAnd);
    }

    #[test]
    fn comparison_below_arithmetic() {
        let program = parse_ok("a + 1 < b * 2;");
        let (op, left, right) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::Less);
        assert_eq!(binary(left).0, BinaryOperator::Add);
        assert_eq!(binary(right).0, BinaryOperator::Multiply);
    }

    #[test]
    fn division_is_not_a_regex() {
        let program = parse_full_ok("a / b;");
        assert_eq!(binary(first_expression(&program)).0, BinaryOperator::Divide);
    }

    #[test]
    fn regex_literal_with_flags() {
        let program = parse_full_ok("let r = /ab+c/gi;");
        match first_expression(&program) {
            Expression::Regex { pattern, flags, .. } => {
                assert_eq!(pattern, "ab+c");
                assert_eq!(flags, "gi");
            }
            other => panic!("expected regex, got {other:?}"),
        }
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        let program = parse_ok("-a * b;");
        let (op, left, _) = binary(first_expression(&program));
        assert_eq!(op, BinaryOperator::Multiply);
        assert!(matches!(
            left,
            Expression::Unary {
                operator: UnaryOperator::Minus,
                ..
            }
        ));
    }

    #[test]
    fn conditional_in_full_dialect() {
        let program = parse_full_ok("a ? b : c ? d : e;");
        match first_expression(&program) {
            Expression::Conditional { alternate, .. } => {
                assert!(matches!(**alternate, Expression::Conditional { .. }));
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn full_operators_are_gated_in_actor_dialect() {
        for source in ["a ? b : c;", "a ?? b;", "a == b;", "a | b;", "a << 1;", "~a;", "a?.b;"] {
            let diagnostics = parse_err(source);
            assert!(
                diagnostics
                    .iter()
                    .any(|d| d.message.contains("not available in the actor dialect")),
                "{source}: {diagnostics:#?}"
            );
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_ok("a = b = 1;");
        match first_expression(&program) {
            Expression::Assignment { target, value, .. } => {
                assert!(matches!(**target, Pattern::Identifier(_)));
                assert!(matches!(**value, Expression::Assignment { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn compound_assignment() {
        let program = parse_ok("count += 1;");
        match first_expression(&program) {
            Expression::Assignment { operator, .. } => {
                assert_eq!(
                    *operator,
                    AssignmentOperator::Compound(BinaryOperator::Add)
                );
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        let diagnostics = parse_err("a **= 2;");
        assert!(diagnostics[0].message.contains("not available"));
    }

    #[test]
    fn member_assignment_target() {
        let program = parse_ok("state.count = 1;");
        match first_expression(&program) {
            Expression::Assignment { target, .. } => {
                assert!(matches!(**target, Pattern::Expression(_)));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn invalid_assignment_target() {
        let diagnostics = parse_err("1 = 2;");
        assert!(diagnostics[0].message.contains("invalid assignment target"));
        let diagnostics = parse_err("a + b += 2;");
        assert!(diagnostics[0].message.contains("invalid assignment target"));
    }

    #[test]
    fn postfix_and_prefix_update() {
        let program = parse_ok("i++;");
        assert!(matches!(
            first_expression(&program),
            Expression::Update { prefix: false, .. }
        ));
        let program = parse_ok("--i;");
        assert!(matches!(
            first_expression(&program),
            Expression::Update { prefix: true, .. }
        ));
        let diagnostics = parse_err("1++;");
        assert!(diagnostics[0].message.contains("invalid operand"));
    }

    #[test]
    fn postfix_update_does_not_cross_lines() {
        let program = parse_ok("a\n++b");
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn member_call_and_subscript_chain() {
        let program = parse_ok("a.b(1, ...c)[0].emit;");
        match first_expression(&program) {
            Expression::Member {
                object, property, ..
            } => {
                assert_eq!(property.name, "emit");
                assert!(matches!(**object, Expression::Subscript { .. }));
            }
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn call_arguments_allow_trailing_comma() {
        let program = parse_ok("f(a, b,);");
        match first_expression(&program) {
            Expression::Call { arguments, .. } => assert_eq!(arguments.len(), 2),
            other => panic!("expected call, got {other:?}"),
        }
        let diagnostics = parse_err("f(a,,b);");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:#?}");
    }

    #[test]
    fn optional_chaining_in_full_dialect() {
        let program = parse_full_ok("a?.b?.[c]?.(d);");
        assert!(matches!(
            first_expression(&program),
            Expression::Call { optional: true, .. }
        ));
    }

    #[test]
    fn action_identifiers_and_meta() {
        let program = parse_ok("@tick(@, 1);");
        match first_expression(&program) {
            Expression::Call {
                callee, arguments, ..
            } => {
                assert!(matches!(&**callee, Expression::ActionIdentifier(id) if id.name == "tick"));
                assert!(matches!(arguments[0], Element::Item(Expression::Meta { .. })));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn arrow_with_parenthesized_parameters() {
        let program = parse_full_ok("let f = (a, b) => a + b;");
        match first_expression(&program) {
            Expression::Arrow(arrow) => {
                assert_eq!(arrow.parameters.len(), 2);
                assert!(matches!(arrow.body, ArrowBody::Expression(_)));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_sequence_is_not_an_arrow() {
        let program = parse_full_ok("(a, b);");
        match first_expression(&program) {
            Expression::Parenthesized { expression, .. } => {
                assert!(matches!(**expression, Expression::Sequence { .. }));
            }
            other => panic!("expected parenthesized, got {other:?}"),
        }
    }

    #[test]
    fn arrow_backtracking_keeps_diagnostics_clean() {
        // Looks like a typed parameter list up to the `:`, but is a
        // conditional.
        let program = parse_full_ok("let v = c ? (a) : b;");
        assert!(matches!(
            first_expression(&program),
            Expression::Conditional { .. }
        ));
    }

    #[test]
    fn arrow_with_types_and_block_body() {
        let program = parse_full_ok("let f = ({x, y}: Point, ...rest: number[]): number => { return x; };");
        match first_expression(&program) {
            Expression::Arrow(arrow) => {
                assert_eq!(arrow.parameters.len(), 2);
                assert!(arrow.parameters[1].rest);
                assert!(arrow.return_type.is_some());
                assert!(matches!(arrow.body, ArrowBody::Block(_)));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn single_parameter_and_async_arrows() {
        let program = parse_full_ok("let f = x => x * 2;");
        assert!(matches!(first_expression(&program), Expression::Arrow(_)));
        let program = parse_full_ok("let g = async (x) => await x;");
        match first_expression(&program) {
            Expression::Arrow(arrow) => {
                assert!(arrow.is_async);
                assert!(matches!(
                    &arrow.body,
                    ArrowBody::Expression(body) if matches!(**body, Expression::Await { .. })
                ));
            }
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn generic_arrow() {
        let program = parse_full_ok("let id = <T>(x: T): T => x;");
        match first_expression(&program) {
            Expression::Arrow(arrow) => assert_eq!(arrow.type_parameters.len(), 1),
            other => panic!("expected arrow, got {other:?}"),
        }
    }

    #[test]
    fn function_expression() {
        let program = parse_full_ok("let f = function named(a) { return a; };");
        match first_expression(&program) {
            Expression::Function(function) => {
                assert_eq!(function.name.as_ref().unwrap().name, "named");
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn template_with_substitutions() {
        let program = parse_full_ok("let s = `a${b}c\\n${d + 1}`;");
        match first_expression(&program) {
            Expression::Template(template) => {
                assert_eq!(template.parts.len(), 4);
                assert!(
                    matches!(&template.parts[2], TemplatePart::Text { raw, .. } if raw == "c\\n")
                );
            }
            other => panic!("expected template, got {other:?}"),
        }
    }

    #[test]
    fn tagged_template() {
        let program = parse_full_ok("html`<p>${x}</p>`;");
        assert!(matches!(
            first_expression(&program),
            Expression::TaggedTemplate { .. }
        ));
    }

    #[test]
    fn missing_operand() {
        let diagnostics = parse_err("let x = 1 + ;");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:#?}");
        assert!(diagnostics[0].message.contains("expected expression"));
    }

    #[test]
    fn reserved_word_in_expression() {
        let diagnostics = parse_full_err("let x = interface;");
        assert!(diagnostics[0].message.contains("reserved word"));
    }

    #[test]
    fn comma_operator_is_gated() {
        let diagnostics = parse_err("a, b;");
        assert!(diagnostics[0].message.contains("comma operator"));
    }
}
