// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! FJX markup.
//!
//! Tags are scanned under [`LexGoal::FjxTag`] so `/>` and `>` come out as
//! single tokens, and element content under [`LexGoal::FjxText`] so text is
//! read raw up to the next `{` or `<`. Expressions inside `{…}` go back to
//! the ordinary code goal.

use crate::ast::{FjxAttribute, FjxAttributeValue, FjxChild, FjxElement, FjxName, Identifier};
use crate::source_analysis::{Keyword, LexGoal, Span, TokenKind};

use super::{Parser, action_name};

impl Parser<'_> {
    /// Parses `<name attr=value …>children</name>` or `<name … />` at a `<`.
    pub(super) fn parse_fjx_element(&mut self) -> FjxElement {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            let start = self.current_span();
            if let Err(too_deep) = self.enter_nesting() {
                let name = Identifier::new("", Span::empty_at(too_deep.span.start()));
                return FjxElement {
                    name: FjxName::Identifier(name),
                    attributes: Vec::new(),
                    children: Vec::new(),
                    closing_name: None,
                    self_closing: true,
                    span: too_deep.span,
                };
            }
            let element = self.parse_fjx_element_inner(start);
            self.leave_nesting();
            element
        })
    }

    fn parse_fjx_element_inner(&mut self, start: Span) -> FjxElement {
        self.advance();
        let name = self
            .parse_fjx_name("element name")
            .unwrap_or_else(|| {
                FjxName::Identifier(Identifier::new("", self.missing_span()))
            });

        let mut attributes = Vec::new();
        loop {
            match self.stream.relex(LexGoal::FjxTag).kind() {
                TokenKind::Identifier | TokenKind::ActionIdentifier | TokenKind::Keyword(_) => {
                    match self.parse_fjx_attribute() {
                        Some(attribute) => attributes.push(attribute),
                        None => break,
                    }
                }
                _ => break,
            }
        }

        self.stream.relex(LexGoal::FjxTag);
        if self.match_token(TokenKind::SlashGreater) {
            return FjxElement {
                name,
                attributes,
                children: Vec::new(),
                closing_name: None,
                self_closing: true,
                span: self.span_from(start),
            };
        }
        if self.expect(TokenKind::Greater, "`>` or `/>`").is_none() {
            return FjxElement {
                name,
                attributes,
                children: Vec::new(),
                closing_name: None,
                self_closing: false,
                span: self.span_from(start),
            };
        }

        let children = self.parse_fjx_children();
        let closing_name = self.parse_fjx_closing_tag(&name);
        FjxElement {
            name,
            attributes,
            children,
            closing_name,
            self_closing: false,
            span: self.span_from(start),
        }
    }

    fn parse_fjx_name(&mut self, what: &str) -> Option<FjxName> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier => {
                self.advance();
                Some(FjxName::Identifier(Identifier::new(
                    token.lexeme(),
                    token.span(),
                )))
            }
            TokenKind::ActionIdentifier => {
                self.advance();
                Some(FjxName::Action(action_name(&token)))
            }
            TokenKind::Keyword(keyword) => {
                self.advance();
                self.reserved_word_error(keyword, token.span());
                None
            }
            _ => {
                self.error_expected(what);
                None
            }
        }
    }

    /// `name=value`
    fn parse_fjx_attribute(&mut self) -> Option<FjxAttribute> {
        let start = self.current_span();
        let name = self.parse_fjx_name("attribute name")?;
        self.expect(TokenKind::Equal, "`=`")?;
        let token = self.stream.relex(LexGoal::FjxTag).clone();
        let span = token.span();
        let value = match token.kind() {
            TokenKind::StringStart => FjxAttributeValue::String(self.parse_string_literal()?),
            TokenKind::Number => {
                self.advance();
                FjxAttributeValue::Number {
                    raw: token.lexeme().into(),
                    span,
                }
            }
            TokenKind::Keyword(keyword @ (Keyword::True | Keyword::False)) => {
                self.advance();
                FjxAttributeValue::Boolean {
                    value: keyword == Keyword::True,
                    span,
                }
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                FjxAttributeValue::Null { span }
            }
            TokenKind::ActionIdentifier => {
                self.advance();
                FjxAttributeValue::Action(action_name(&token))
            }
            TokenKind::LeftBrace => {
                self.advance();
                let expression = self.parse_expression();
                self.expect(TokenKind::RightBrace, "`}`");
                FjxAttributeValue::Expression {
                    expression,
                    span: self.span_from(span),
                }
            }
            _ => {
                self.error_expected("attribute value");
                return None;
            }
        };
        Some(FjxAttribute {
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// Children up to the closing `</`.
    fn parse_fjx_children(&mut self) -> Vec<FjxChild> {
        let mut children = Vec::new();
        loop {
            let token = self.stream.relex(LexGoal::FjxText).clone();
            match token.kind() {
                TokenKind::FjxText => {
                    self.advance();
                    if !token.lexeme().trim().is_empty() {
                        children.push(FjxChild::Text {
                            text: token.lexeme().into(),
                            span: token.span(),
                        });
                    }
                }
                TokenKind::Less => children.push(FjxChild::Element(self.parse_fjx_element())),
                TokenKind::LeftBrace => {
                    let start = self.advance().span();
                    let expression = self.parse_expression();
                    self.expect(TokenKind::RightBrace, "`}`");
                    children.push(FjxChild::Expression {
                        expression,
                        span: self.span_from(start),
                    });
                }
                TokenKind::LessSlash => return children,
                _ => {
                    // Only end of input reaches here: text scanning stops at
                    // `{` and `<` only.
                    self.error_expected("closing tag");
                    return children;
                }
            }
            if self.reporter.limit_reached() {
                return children;
            }
        }
    }

    /// `</name>`, checked against the opening name.
    fn parse_fjx_closing_tag(&mut self, name: &FjxName) -> Option<FjxName> {
        if !self.match_token(TokenKind::LessSlash) {
            return None;
        }
        let closing = self.parse_fjx_name("closing tag name");
        if let Some(closing) = &closing
            && !closing.matches(name)
        {
            self.error_at(
                closing.span(),
                ecow::eco_format!(
                    "mismatched closing tag: expected `</{name}>`, found `</{closing}>`"
                ),
            );
        }
        self.stream.relex(LexGoal::FjxTag);
        self.expect(TokenKind::Greater, "`>`");
        closing
    }
}
