// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.
//!
//! Dispatch is on the first token. A `{` at statement start is always a
//! block. Statements that end in a terminator accept `;` or an automatic
//! semicolon; when neither is possible the parser reports it and skips to
//! the next statement boundary.

use crate::ast::{Block, CatchClause, Declaration, ForInit, Statement, SwitchCase};
use crate::source_analysis::{Diagnostic, Keyword, Span, TokenKind};

use super::Parser;

impl Parser<'_> {
    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Parses one statement or declaration.
    pub(super) fn parse_statement(&mut self) -> Statement {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            if let Err(too_deep) = self.enter_nesting() {
                return too_deep.statement();
            }
            let statement = self.parse_statement_inner();
            self.leave_nesting();
            statement
        })
    }

    fn parse_statement_inner(&mut self) -> Statement {
        match self.current_kind() {
            TokenKind::LeftBrace => Statement::Block(self.parse_block()),
            TokenKind::Semicolon => Statement::Empty {
                span: self.advance().span(),
            },
            TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => {
                let span = self.current_span();
                self.skip_unexpected();
                Statement::Error {
                    message: "unexpected closing delimiter".into(),
                    span,
                }
            }
            TokenKind::Keyword(keyword) => self.parse_keyword_statement(keyword),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_keyword_statement(&mut self, keyword: Keyword) -> Statement {
        match keyword {
            Keyword::If => self.parse_if_statement(),
            Keyword::For => self.parse_for_statement(),
            Keyword::Switch => self.parse_switch_statement(),
            Keyword::Try => self.parse_try_statement(),
            Keyword::Break => {
                let span = self.advance().span();
                self.end_statement();
                Statement::Break {
                    span: self.span_from(span),
                }
            }
            Keyword::Continue => {
                let span = self.advance().span();
                self.end_statement();
                Statement::Continue {
                    span: self.span_from(span),
                }
            }
            Keyword::Return => self.parse_return_statement(),
            Keyword::Throw => {
                let start = self.advance().span();
                let argument = self.parse_expression();
                self.end_statement();
                Statement::Throw {
                    argument,
                    span: self.span_from(start),
                }
            }
            Keyword::Emit => {
                let start = self.advance().span();
                let message = self.parse_expression();
                self.end_statement();
                Statement::Emit {
                    message,
                    span: self.span_from(start),
                }
            }
            Keyword::Assert => self.parse_assert_statement(),
            Keyword::Import => Statement::Import(self.parse_import_declaration()),
            Keyword::Export => Statement::Export(self.parse_export_declaration()),
            Keyword::Let | Keyword::Const | Keyword::Actor | Keyword::Type | Keyword::Function
            | Keyword::Interface => match self.parse_declaration() {
                Some(declaration) => Statement::Declaration(declaration),
                None => self.statement_error("expected declaration"),
            },
            Keyword::Async if self.peek_kind(1) == TokenKind::Keyword(Keyword::Function) => {
                match self.parse_declaration() {
                    Some(declaration) => Statement::Declaration(declaration),
                    None => self.statement_error("expected declaration"),
                }
            }
            Keyword::Else | Keyword::Case | Keyword::Catch | Keyword::Finally => {
                let span = self.current_span();
                self.skip_unexpected();
                self.synchronize();
                Statement::Error {
                    message: ecow::eco_format!("`{keyword}` without a matching statement"),
                    span,
                }
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Statement {
        let expression = self.parse_expression();
        let start = expression.span();
        self.end_statement();
        Statement::Expression {
            expression,
            span: self.span_from(start),
        }
    }

    /// Consumes a statement terminator, skipping to the next statement
    /// boundary if there is none.
    pub(super) fn end_statement(&mut self) {
        if !self.consume_terminator() {
            self.synchronize();
        }
    }

    fn statement_error(&mut self, message: &str) -> Statement {
        let start = self.current_span();
        self.synchronize();
        Statement::Error {
            message: message.into(),
            span: self.span_from(start),
        }
    }

    /// Reports a missing required clause.
    fn structural_error(&mut self, span: Span, message: &str) {
        self.reporter.report(Diagnostic::structural(message, span));
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// `{ statements }`
    pub(super) fn parse_block(&mut self) -> Block {
        let start = self.current_span();
        if self.expect(TokenKind::LeftBrace, "`{`").is_none() {
            return Block {
                statements: Vec::new(),
                span: self.missing_span(),
            };
        }
        let statements = self.parse_statements_until(|kind| kind == TokenKind::RightBrace);
        self.expect(TokenKind::RightBrace, "`}`");
        Block {
            statements,
            span: self.span_from(start),
        }
    }

    /// Parses statements until `stop` accepts the current token, end of
    /// input, or the diagnostic limit.
    fn parse_statements_until(&mut self, stop: impl Fn(TokenKind) -> bool) -> Vec<Statement> {
        let mut statements = Vec::new();
        loop {
            let kind = self.current_kind();
            if stop(kind) || kind.is_eof() || self.reporter.limit_reached() {
                return statements;
            }
            let before = self.stream.position();
            statements.push(self.parse_statement());
            if self.stream.position() == before {
                self.skip_unexpected();
            }
        }
    }

    // ========================================================================
    // Control Flow
    // ========================================================================

    fn parse_condition(&mut self) -> crate::ast::Expression {
        self.expect(TokenKind::LeftParen, "`(`");
        let condition = self.parse_expression();
        self.expect(TokenKind::RightParen, "`)`");
        condition
    }

    fn parse_if_statement(&mut self) -> Statement {
        let start = self.advance().span();
        let condition = self.parse_condition();
        let consequent = Box::new(self.parse_statement());
        let alternate = self
            .match_keyword(Keyword::Else)
            .then(|| Box::new(self.parse_statement()));
        Statement::If {
            condition,
            consequent,
            alternate,
            span: self.span_from(start),
        }
    }

    /// C-style `for (init; condition; update) body`.
    fn parse_for_statement(&mut self) -> Statement {
        let start = self.advance().span();
        self.expect(TokenKind::LeftParen, "`(`");

        let init = match self.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Keyword(Keyword::Let | Keyword::Const) => {
                Some(ForInit::Declaration(self.parse_lexical_declaration(false)))
            }
            _ => Some(ForInit::Expression(self.parse_expression())),
        };
        self.expect(TokenKind::Semicolon, "`;`");

        let condition = (!self.check(TokenKind::Semicolon)).then(|| self.parse_expression());
        self.expect(TokenKind::Semicolon, "`;`");

        let update = (!self.check(TokenKind::RightParen)).then(|| self.parse_expression());
        self.expect(TokenKind::RightParen, "`)`");

        let body = Box::new(self.parse_statement());
        Statement::For {
            init,
            condition,
            update,
            body,
            span: self.span_from(start),
        }
    }

    fn parse_switch_statement(&mut self) -> Statement {
        let start = self.advance().span();
        let discriminant = self.parse_condition();
        let mut cases = Vec::new();
        if self.expect(TokenKind::LeftBrace, "`{`").is_some() {
            loop {
                let case_start = self.current_span();
                let test = match self.current_kind() {
                    TokenKind::RightBrace | TokenKind::Eof => break,
                    TokenKind::Keyword(Keyword::Case) => {
                        self.advance();
                        Some(self.parse_expression())
                    }
                    TokenKind::Keyword(Keyword::Default) => {
                        self.advance();
                        None
                    }
                    _ => {
                        self.error_expected("`case`, `default` or `}`");
                        self.synchronize();
                        continue;
                    }
                };
                self.expect(TokenKind::Colon, "`:`");
                let body = self.parse_statements_until(|kind| {
                    matches!(
                        kind,
                        TokenKind::RightBrace
                            | TokenKind::Keyword(Keyword::Case | Keyword::Default)
                    )
                });
                cases.push(SwitchCase {
                    test,
                    body,
                    span: self.span_from(case_start),
                });
                if self.reporter.limit_reached() {
                    break;
                }
            }
            self.expect(TokenKind::RightBrace, "`}`");
        }
        Statement::Switch {
            discriminant,
            cases,
            span: self.span_from(start),
        }
    }

    fn parse_try_statement(&mut self) -> Statement {
        let start = self.advance().span();
        let block = self.parse_block();

        let handler = if self.check_keyword(Keyword::Catch) {
            let catch_start = self.advance().span();
            let parameter = if self.match_token(TokenKind::LeftParen) {
                let pattern = self.parse_binding_pattern();
                self.expect(TokenKind::RightParen, "`)`");
                Some(pattern)
            } else {
                None
            };
            let body = self.parse_block();
            Some(CatchClause {
                parameter,
                body,
                span: self.span_from(catch_start),
            })
        } else {
            None
        };

        let finalizer = self
            .match_keyword(Keyword::Finally)
            .then(|| self.parse_block());

        let span = self.span_from(start);
        if handler.is_none() && finalizer.is_none() {
            self.structural_error(span, "try statement requires a catch or finally clause");
        }
        Statement::Try {
            block,
            handler,
            finalizer,
            span,
        }
    }

    /// `return` is a restricted production: a line break after it ends the
    /// statement.
    fn parse_return_statement(&mut self) -> Statement {
        let start = self.advance().span();
        let argument = if matches!(
            self.current_kind(),
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        ) || self.at_new_line()
        {
            None
        } else {
            Some(self.parse_expression())
        };
        self.end_statement();
        Statement::Return {
            argument,
            span: self.span_from(start),
        }
    }

    /// `assert condition [, message];`
    fn parse_assert_statement(&mut self) -> Statement {
        let start = self.advance().span();
        let condition = self.parse_assignment();
        let message = self
            .match_token(TokenKind::Comma)
            .then(|| self.parse_assignment());
        self.end_statement();
        Statement::Assert {
            condition,
            message,
            span: self.span_from(start),
        }
    }

    /// Parses a declaration at the current token, if it starts one.
    pub(super) fn parse_declaration(&mut self) -> Option<Declaration> {
        let declaration = match self.current_kind() {
            TokenKind::Keyword(Keyword::Let | Keyword::Const) => {
                Declaration::Lexical(self.parse_lexical_declaration(true))
            }
            TokenKind::Keyword(Keyword::Actor) => Declaration::Actor(self.parse_actor_declaration()),
            TokenKind::Keyword(Keyword::Type) => Declaration::TypeAlias(self.parse_type_alias()),
            TokenKind::Keyword(Keyword::Interface) => {
                Declaration::Interface(self.parse_interface_declaration())
            }
            TokenKind::Keyword(Keyword::Function) => {
                let start = self.advance().span();
                Declaration::Function(self.parse_function_rest(start, false, true))
            }
            TokenKind::Keyword(Keyword::Async)
                if self.peek_kind(1) == TokenKind::Keyword(Keyword::Function) =>
            {
                let start = self.advance().span();
                self.advance();
                Declaration::Function(self.parse_function_rest(start, true, true))
            }
            _ => {
                self.error_expected("declaration");
                return None;
            }
        };
        Some(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_full_err, parse_full_ok, parse_in, parse_ok};
    use crate::ast::{Expression, Pattern};
    use crate::source_analysis::{DiagnosticKind, Dialect};

    use super::*;

    #[test]
    fn automatic_semicolons_split_lines() {
        let program = parse_ok("let x = 1\nlet y = 2");
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn continuation_lines_do_not_split() {
        let program = parse_ok("let x = 1 +\n1");
        assert_eq!(program.statements.len(), 1);
        let Statement::Declaration(Declaration::Lexical(decl)) = &program.statements[0] else {
            panic!("expected declaration");
        };
        assert!(matches!(decl.declarators[0].init, Some(Expression::Binary { .. })));
    }

    #[test]
    fn missing_semicolon_on_one_line() {
        let output = parse_in("a b c;\nd;", Dialect::Actor);
        assert_eq!(output.diagnostics.len(), 1, "{:#?}", output.diagnostics);
        assert!(output.diagnostics[0].message.contains("expected `;`"));
        assert_eq!(output.program.statements.len(), 2);
    }

    #[test]
    fn if_else_chain() {
        let program = parse_ok("if (a) { b; } else if (c) d; else { e; }");
        let Statement::If { alternate: Some(alternate), .. } = &program.statements[0] else {
            panic!("expected if with else");
        };
        assert!(matches!(**alternate, Statement::If { alternate: Some(_), .. }));
    }

    #[test]
    fn for_statement_forms() {
        let program = parse_ok("for (let i = 0; i < 10; i++) { emit i; }");
        assert!(matches!(
            &program.statements[0],
            Statement::For {
                init: Some(ForInit::Declaration(_)),
                condition: Some(_),
                update: Some(_),
                ..
            }
        ));
        let program = parse_ok("for (;;) {}");
        assert!(matches!(
            &program.statements[0],
            Statement::For {
                init: None,
                condition: None,
                update: None,
                ..
            }
        ));
        let program = parse_ok("for (i = 0; ; i += 1) break;");
        assert!(matches!(
            &program.statements[0],
            Statement::For {
                init: Some(ForInit::Expression(_)),
                ..
            }
        ));
    }

    #[test]
    fn for_in_is_rejected() {
        let diagnostics = parse_err("for (let k in o) {}");
        assert!(diagnostics[0].message.contains("expected"));
    }

    #[test]
    fn switch_cases() {
        let program = parse_ok("switch (x) { case 1: a; b; case 2: default: c; }");
        let Statement::Switch { cases, .. } = &program.statements[0] else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].body.len(), 2);
        assert!(cases[1].body.is_empty());
        assert!(cases[2].test.is_none());
    }

    #[test]
    fn try_forms() {
        let program = parse_ok("try { a; } catch ({message}) { b; } finally { c; }");
        let Statement::Try { handler: Some(handler), finalizer: Some(_), .. } = &program.statements[0]
        else {
            panic!("expected try");
        };
        assert!(matches!(handler.parameter, Some(Pattern::Object { .. })));
        parse_ok("try {} catch {}");
        parse_ok("try {} finally {}");
    }

    #[test]
    fn try_without_handler_is_structural() {
        let diagnostics = parse_err("try { a; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Structural);
        assert!(diagnostics[0].message.contains("requires a catch or finally"));
    }

    #[test]
    fn return_is_restricted() {
        let program = parse_full_ok("function f() { return\n1 }");
        let Statement::Declaration(Declaration::Function(function)) = &program.statements[0] else {
            panic!("expected function");
        };
        assert_eq!(function.body.statements.len(), 2);
        assert!(matches!(
            function.body.statements[0],
            Statement::Return { argument: None, .. }
        ));
    }

    #[test]
    fn return_regex_literal() {
        let program = parse_full_ok("function f() { return /ab+c/g; }");
        let Statement::Declaration(Declaration::Function(function)) = &program.statements[0] else {
            panic!("expected function");
        };
        assert!(matches!(
            &function.body.statements[0],
            Statement::Return {
                argument: Some(Expression::Regex { .. }),
                ..
            }
        ));
    }

    #[test]
    fn emit_and_assert() {
        let program = parse_ok("emit @tick;\nassert x > 0, \"positive\";\nassert ok");
        assert!(matches!(program.statements[0], Statement::Emit { .. }));
        assert!(matches!(
            program.statements[1],
            Statement::Assert { message: Some(_), .. }
        ));
        assert!(matches!(
            program.statements[2],
            Statement::Assert { message: None, .. }
        ));
    }

    #[test]
    fn throw_and_loop_control() {
        let program = parse_ok("for (;;) { if (a) break; else continue; }\nthrow err;");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[1], Statement::Throw { .. }));
    }

    #[test]
    fn empty_statements_and_blocks() {
        let program = parse_ok(";{};{ { } }");
        assert_eq!(program.statements.len(), 4);
        assert!(matches!(program.statements[0], Statement::Empty { .. }));
        assert!(matches!(program.statements[1], Statement::Block(_)));
    }

    #[test]
    fn block_error_recovery() {
        let output = parse_in("{ let = ; a; }\nb;", Dialect::Actor);
        assert_eq!(output.program.statements.len(), 2, "{:#?}", output.program);
        let Statement::Block(block) = &output.program.statements[0] else {
            panic!("expected block");
        };
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn unclosed_block_is_reported() {
        let diagnostics = parse_err("{ a;");
        assert!(diagnostics[0].message.contains("expected `}`"));
    }

    #[test]
    fn stray_else_is_reported() {
        let diagnostics = parse_err("else a;");
        assert!(diagnostics[0].message.contains("unexpected keyword `else`"));
    }

    #[test]
    fn return_is_a_name_in_actor_dialect() {
        let diagnostics = parse_err("return 1;");
        assert!(diagnostics[0].message.contains("expected `;`"));
        parse_full_err("emit x;");
    }
}
