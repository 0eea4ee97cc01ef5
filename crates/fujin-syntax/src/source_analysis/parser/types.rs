// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type syntax.
//!
//! Types use a two-level climbing loop: unions of intersections of
//! postfix (`T[]`) primaries. Both operators are left-associative and a
//! leading `|` is allowed (`type T = | A | B`).

use crate::ast::{
    Identifier, LiteralType, Parameter, PredefinedType, TupleElement, Type, TypeMember,
    TypeParameter,
};
use crate::source_analysis::{Keyword, Span, TokenKind};

use super::Parser;

impl Parser<'_> {
    // ========================================================================
    // Unions and Intersections
    // ========================================================================

    /// Parses a type.
    pub(super) fn parse_type(&mut self) -> Type {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(too_deep) = self.enter_nesting() {
                return too_deep.ty();
            }
            let ty = self.parse_union_type();
            self.leave_nesting();
            ty
        })
    }

    fn parse_union_type(&mut self) -> Type {
        self.match_token(TokenKind::Pipe);
        let mut left = self.parse_intersection_type();
        while self.match_token(TokenKind::Pipe) {
            let right = self.parse_intersection_type();
            let span = left.span().merge(right.span());
            left = Type::Union {
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    fn parse_intersection_type(&mut self) -> Type {
        let mut left = self.parse_array_type();
        while self.check(TokenKind::Amp) {
            let amp = self.advance().span();
            if !self.dialect().has_rich_types() {
                self.unavailable(amp, "intersection types");
            }
            let right = self.parse_array_type();
            let span = left.span().merge(right.span());
            left = Type::Intersection {
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        left
    }

    /// `T[]`, repeatable.
    fn parse_array_type(&mut self) -> Type {
        let mut element = self.parse_primary_type();
        while self.check(TokenKind::LeftBracket) && self.peek_kind(1) == TokenKind::RightBracket {
            self.advance();
            self.advance();
            let span = self.span_from(element.span());
            element = Type::Array {
                element: Box::new(element),
                span,
            };
        }
        element
    }

    // ========================================================================
    // Primary Types
    // ========================================================================

    fn parse_primary_type(&mut self) -> Type {
        let token = self.current_token().clone();
        let span = token.span();
        match token.kind() {
            TokenKind::Identifier | TokenKind::Keyword(Keyword::Action) => {
                self.advance();
                if let Some(kind) = PredefinedType::from_name(token.lexeme()) {
                    return Type::Predefined { kind, span };
                }
                let name = Identifier::new(token.lexeme(), span);
                let arguments = if self.check(TokenKind::Less) {
                    self.parse_type_arguments()
                } else {
                    Vec::new()
                };
                Type::Reference {
                    name,
                    arguments,
                    span: self.span_from(span),
                }
            }
            TokenKind::Number => {
                self.advance();
                Type::Literal {
                    literal: LiteralType::Number(token.lexeme().into()),
                    span,
                }
            }
            TokenKind::StringStart => match self.parse_string_literal() {
                Some(literal) => Type::Literal {
                    span: literal.span,
                    literal: LiteralType::String(literal),
                },
                None => type_error(span),
            },
            TokenKind::Keyword(keyword @ (Keyword::True | Keyword::False)) => {
                self.advance();
                Type::Literal {
                    literal: LiteralType::Boolean(keyword == Keyword::True),
                    span,
                }
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Type::Literal {
                    literal: LiteralType::Null,
                    span,
                }
            }
            TokenKind::LeftBrace => self.parse_object_type(),
            TokenKind::LeftBracket => self.parse_tuple_type(),
            TokenKind::LeftParen => self.parse_parenthesized_or_function_type(),
            TokenKind::Less => {
                let type_parameters = self.parse_type_parameters();
                self.parse_function_type(span, type_parameters)
            }
            TokenKind::Keyword(keyword) => {
                self.advance();
                self.reserved_word_error(keyword, span);
                type_error(span)
            }
            _ => {
                self.error_expected("type");
                type_error(self.missing_span())
            }
        }
    }

    /// `[A, B, ...C]`
    fn parse_tuple_type(&mut self) -> Type {
        let start = self.advance().span();
        if !self.dialect().has_rich_types() {
            self.unavailable(start, "tuple types");
        }
        let elements = self.parse_delimited(TokenKind::RightBracket, |parser| {
            let start = parser.current_span();
            if parser.match_token(TokenKind::Ellipsis) {
                let element = parser.parse_type();
                Some(TupleElement::Rest {
                    element,
                    span: parser.span_from(start),
                })
            } else {
                Some(TupleElement::Type(parser.parse_type()))
            }
        });
        let last = elements.len().saturating_sub(1);
        for element in &elements[..last] {
            if let TupleElement::Rest { span, .. } = element {
                self.error_at(*span, "a rest element must be last in a tuple type");
            }
        }
        Type::Tuple {
            elements,
            span: self.span_from(start),
        }
    }

    /// `(params) => R`, or `(T)` in the full dialect.
    fn parse_parenthesized_or_function_type(&mut self) -> Type {
        let start = self.current_span();
        if !self.dialect().has_rich_types()
            || self.paren_group_followed_by(|kind| kind == TokenKind::Arrow)
        {
            return self.parse_function_type(start, Vec::new());
        }
        self.advance();
        let inner = self.parse_type();
        self.expect(TokenKind::RightParen, "`)`");
        Type::Parenthesized {
            inner: Box::new(inner),
            span: self.span_from(start),
        }
    }

    /// `<T>(params) => R`. Actor types must return `void`.
    fn parse_function_type(&mut self, start: Span, type_parameters: Vec<TypeParameter>) -> Type {
        let parameters = self.parse_formal_parameters();
        self.expect(TokenKind::Arrow, "`=>`");
        let return_type = self.parse_type();
        if !self.dialect().has_rich_types()
            && !matches!(
                return_type,
                Type::Predefined {
                    kind: PredefinedType::Void,
                    ..
                } | Type::Error { .. }
            )
        {
            self.error_at(return_type.span(), "an actor type must return `void`");
        }
        Type::Function {
            type_parameters,
            parameters,
            return_type: Box::new(return_type),
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Object Types
    // ========================================================================

    fn parse_object_type(&mut self) -> Type {
        let start = self.current_span();
        let members = self.parse_type_members();
        Type::Object {
            members,
            span: self.span_from(start),
        }
    }

    /// `{ member (sep member)* sep? }` where a separator is `,`, `;` or a
    /// line break. Also the body of interface declarations.
    pub(super) fn parse_type_members(&mut self) -> Vec<TypeMember> {
        let mut members = Vec::new();
        if self.expect(TokenKind::LeftBrace, "`{`").is_none() {
            return members;
        }
        self.skip_type_member_separator();
        loop {
            if self.check(TokenKind::RightBrace) || self.is_at_end() {
                break;
            }
            match self.parse_type_member() {
                Some(member) => members.push(member),
                None => {
                    self.recover_to(TokenKind::RightBrace);
                    break;
                }
            }
            if self.skip_type_member_separator()
                || self.check(TokenKind::RightBrace)
                || self.at_new_line()
            {
                continue;
            }
            self.error_expected("`,`, `;` or `}`");
            self.recover_to(TokenKind::RightBrace);
            break;
        }
        self.expect(TokenKind::RightBrace, "`}`");
        members
    }

    fn skip_type_member_separator(&mut self) -> bool {
        self.match_token(TokenKind::Comma) || self.match_token(TokenKind::Semicolon)
    }

    fn parse_type_member(&mut self) -> Option<TypeMember> {
        let start = self.current_span();
        if matches!(self.current_kind(), TokenKind::LeftParen | TokenKind::Less) {
            if !self.dialect().has_rich_types() {
                self.unavailable(start, "call signatures");
            }
            let (type_parameters, parameters, return_type) = self.parse_signature();
            return Some(TypeMember::Call {
                type_parameters,
                parameters,
                return_type,
                span: self.span_from(start),
            });
        }
        let key = self.parse_property_key()?;
        let optional = self.match_token(TokenKind::Question);
        if matches!(self.current_kind(), TokenKind::LeftParen | TokenKind::Less) {
            let (type_parameters, parameters, return_type) = self.parse_signature();
            return Some(TypeMember::Method {
                key,
                optional,
                type_parameters,
                parameters,
                return_type,
                span: self.span_from(start),
            });
        }
        let type_annotation = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());
        Some(TypeMember::Property {
            key,
            optional,
            type_annotation,
            span: self.span_from(start),
        })
    }

    fn parse_signature(
        &mut self,
    ) -> (Vec<TypeParameter>, Vec<Parameter>, Option<Type>) {
        let type_parameters = if self.check(TokenKind::Less) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        let parameters = self.parse_formal_parameters();
        let return_type = self
            .match_token(TokenKind::Colon)
            .then(|| self.parse_type());
        (type_parameters, parameters, return_type)
    }

    // ========================================================================
    // Type Parameters and Arguments
    // ========================================================================

    /// `<A, B,>` after a generic type name.
    pub(super) fn parse_type_arguments(&mut self) -> Vec<Type> {
        let start = self.advance().span();
        let arguments =
            self.parse_delimited(TokenKind::Greater, |parser| Some(parser.parse_type()));
        if arguments.is_empty() {
            self.error_at(self.span_from(start), "expected at least one type argument");
        }
        arguments
    }

    /// `<T, U extends V,>`; `extends` constraints are full-dialect only.
    pub(super) fn parse_type_parameters(&mut self) -> Vec<TypeParameter> {
        let Some(open) = self.expect(TokenKind::Less, "`<`") else {
            return Vec::new();
        };
        let parameters = self.parse_delimited(TokenKind::Greater, |parser| {
            let name = parser.parse_identifier("type parameter name")?;
            let start = name.span;
            let constraint = if parser.check_keyword(Keyword::Extends)
                || parser.current_token().is_contextual("extends")
            {
                let extends = parser.advance().span();
                if !parser.dialect().has_rich_types() {
                    parser.unavailable(extends, "type parameter constraints");
                }
                Some(parser.parse_type())
            } else {
                None
            };
            Some(TypeParameter {
                name,
                constraint,
                span: parser.span_from(start),
            })
        });
        if parameters.is_empty() {
            self.error_at(self.span_from(open.span()), "expected at least one type parameter");
        }
        parameters
    }
}

fn type_error(span: Span) -> Type {
    Type::Error {
        message: "expected type".into(),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_full_err, parse_full_ok, parse_ok};
    use crate::ast::{Declaration, Program, Statement, TypeAliasName};

    use super::*;

    fn alias_type(program: &Program) -> &Type {
        match &program.statements[0] {
            Statement::Declaration(Declaration::TypeAlias(alias)) => &alias.value,
            other => panic!("expected type alias, got {other:?}"),
        }
    }

    #[test]
    fn predefined_and_reference_types() {
        let program = parse_ok("type A = u32;");
        assert!(matches!(
            alias_type(&program),
            Type::Predefined {
                kind: PredefinedType::U32,
                ..
            }
        ));
        let program = parse_ok("type A = Point;");
        assert!(matches!(alias_type(&program), Type::Reference { arguments, .. } if arguments.is_empty()));
        let program = parse_ok("type A = action;");
        assert!(matches!(
            alias_type(&program),
            Type::Predefined {
                kind: PredefinedType::Action,
                ..
            }
        ));
    }

    #[test]
    fn generic_arguments_split_shift() {
        let program = parse_ok("type A = Map<string, List<u8>>;");
        let Type::Reference { arguments, .. } = alias_type(&program) else {
            panic!("expected reference");
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(&arguments[1], Type::Reference { arguments, .. } if arguments.len() == 1));
    }

    #[test]
    fn union_with_leading_pipe_is_left_associative() {
        let program = parse_ok("type A = | \"a\" | \"b\" | 1;");
        let Type::Union { left, right, .. } = alias_type(&program) else {
            panic!("expected union");
        };
        assert!(matches!(**left, Type::Union { .. }));
        assert!(matches!(
            **right,
            Type::Literal {
                literal: LiteralType::Number(_),
                ..
            }
        ));
    }

    #[test]
    fn intersection_binds_tighter_than_union() {
        let program = parse_full_ok("type A = B | C & D;");
        let Type::Union { right, .. } = alias_type(&program) else {
            panic!("expected union");
        };
        assert!(matches!(**right, Type::Intersection { .. }));
    }

    #[test]
    fn array_suffix_repeats() {
        let program = parse_ok("type A = u8[][];");
        let Type::Array { element, .. } = alias_type(&program) else {
            panic!("expected array");
        };
        assert!(matches!(**element, Type::Array { .. }));
    }

    #[test]
    fn object_type_separators() {
        let program = parse_ok("type A = {, a: u8; b?: string\n c, @tick: action,};");
        let Type::Object { members, .. } = alias_type(&program) else {
            panic!("expected object type");
        };
        assert_eq!(members.len(), 4);
        assert!(matches!(
            &members[1],
            TypeMember::Property { optional: true, .. }
        ));
        assert!(matches!(
            &members[2],
            TypeMember::Property {
                type_annotation: None,
                ..
            }
        ));
    }

    #[test]
    fn object_type_requires_separator_on_one_line() {
        let diagnostics = parse_err("type A = { a: u8 b: u8 };");
        assert!(diagnostics[0].message.contains("expected `,`, `;` or `}`"));
    }

    #[test]
    fn method_and_call_signatures() {
        let program = parse_full_ok("type A = { (x: number): string; m?<T>(a: T): T };");
        let Type::Object { members, .. } = alias_type(&program) else {
            panic!("expected object type");
        };
        assert!(matches!(&members[0], TypeMember::Call { .. }));
        assert!(matches!(
            &members[1],
            TypeMember::Method {
                optional: true,
                type_parameters,
                ..
            } if type_parameters.len() == 1
        ));
        let diagnostics = parse_err("type A = { (x: u8): u8 };");
        assert_eq!(
            diagnostics[0].message.as_str(),
            "not available in the actor dialect: call signatures"
        );
    }

    #[test]
    fn actor_object_type_has_method_signatures() {
        let program = parse_ok("type O = { a?: number; b(x: u8): void, };");
        let Type::Object { members, .. } = alias_type(&program) else {
            panic!("expected object type");
        };
        assert!(matches!(&members[0], TypeMember::Property { optional: true, .. }));
        assert!(matches!(
            &members[1],
            TypeMember::Method { parameters, return_type: Some(_), .. } if parameters.len() == 1
        ));
    }

    #[test]
    fn actor_type_returns_void() {
        let program = parse_ok("type Handler = <T>(value: T) => void;");
        assert!(matches!(alias_type(&program), Type::Function { type_parameters, .. } if type_parameters.len() == 1));
        let diagnostics = parse_err("type Handler = (value: u8) => u8;");
        assert!(diagnostics[0].message.contains("must return `void`"));
    }

    #[test]
    fn function_and_parenthesized_types() {
        let program = parse_full_ok("type F = (a: number, ...rest: string[]) => (A | B)[];");
        let Type::Function { parameters, return_type, .. } = alias_type(&program) else {
            panic!("expected function type");
        };
        assert!(parameters[1].rest);
        assert!(matches!(&**return_type, Type::Array { element, .. } if matches!(**element, Type::Parenthesized { .. })));
    }

    #[test]
    fn tuple_types() {
        let program = parse_full_ok("type T = [number, string, ...boolean[]];");
        assert!(matches!(alias_type(&program), Type::Tuple { elements, .. } if elements.len() == 3));
        let diagnostics = parse_full_err("type T = [...number[], string];");
        assert!(diagnostics[0].message.contains("must be last in a tuple"));
        let diagnostics = parse_err("type T = [u8];");
        assert!(diagnostics[0].message.contains("tuple types"));
    }

    #[test]
    fn type_parameter_constraints() {
        let program = parse_full_ok("type Box<T extends object, U> = T;");
        let Statement::Declaration(Declaration::TypeAlias(alias)) = &program.statements[0] else {
            panic!("expected type alias");
        };
        assert!(matches!(&alias.name, TypeAliasName::Plain(name) if name.name == "Box"));
        assert!(alias.type_parameters[0].constraint.is_some());
        assert!(alias.type_parameters[1].constraint.is_none());
        let diagnostics = parse_err("type Box<T extends u8> = T;");
        assert!(diagnostics[0].message.contains("type parameter constraints"));
    }

    #[test]
    fn missing_type_is_reported() {
        let diagnostics = parse_err("let x: = 1;");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:#?}");
        assert!(diagnostics[0].message.contains("expected type"));
    }
}
