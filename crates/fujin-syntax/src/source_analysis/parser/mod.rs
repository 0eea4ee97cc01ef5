// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parser for Fujin source code.
//!
//! This module implements a hand-written recursive descent parser over a
//! [`TokenStream`]. Binary operators use Pratt parsing with the binding
//! powers defined below.
//!
//! # Design
//!
//! The parser is designed for error recovery:
//! - Always produces a [`Program`], even with errors
//! - Uses error nodes (`Expression::Error`, `Statement::Error`, ...) to
//!   represent unparseable code
//! - Collects all diagnostics rather than stopping at the first error, up to
//!   [`ParseOptions::max_diagnostics`]
//! - Recovers by skipping to the next statement boundary
//!
//! Both dialects share one parser; [`Dialect`] predicates decide which
//! productions are reachable. The only backtracking point is the
//! speculative parse of a parenthesized arrow parameter list.
//!
//! # Operator Precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 1 | `,` (full dialect) |
//! | 2 | `=` and compound assignment (right) |
//! | 3 | `? :` (right) |
//! | 4 | `\|\|` `??` |
//! | 5 | `&&` |
//! | 6 | `\|` |
//! | 7 | `^` |
//! | 8 | `&` |
//! | 9 | `==` `!=` `===` `!==` |
//! | 10 | `<` `>` `<=` `>=` |
//! | 11 | `<<` `>>` `>>>` |
//! | 12 | `+` `-` |
//! | 13 | `*` `/` `%` |
//! | 14 | `**` (right) |
//! | 15 | prefix unary, `await` |
//! | 16 | postfix `++` `--` |
//! | 17 | member access, call, subscript, tagged template |
//!
//! # Example
//!
//! ```
//! use fujin_syntax::source_analysis::{parse, Dialect, ParseOptions, SourceBuffer};
//!
//! let source = SourceBuffer::new("emit <div>hello</div>;");
//! let output = parse(&source, &ParseOptions::new(Dialect::Actor));
//! assert!(output.diagnostics.is_empty());
//! assert_eq!(output.program.statements.len(), 1);
//! ```

use ecow::EcoString;

use crate::ast::{
    BinaryOperator, Expression, Identifier, Program, PropertyKey, Statement, StringLiteral, Type,
};
use crate::source_analysis::{
    Diagnostic, Dialect, Keyword, LexError, LexGoal, ParseOptions, Reporter, Scanner,
    SourceBuffer, Span, Token, TokenKind, TokenStream,
};

mod declarations;
mod expressions;
mod fjx;
mod patterns;
mod statements;
mod types;

#[cfg(test)]
mod property_tests;

// ============================================================================
// Public API
// ============================================================================

/// The result of parsing one source text.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// The syntax tree. Always present; unparseable code becomes error nodes.
    pub program: Program,
    /// Lexical, syntax and structural diagnostics in source order of
    /// discovery.
    pub diagnostics: Vec<Diagnostic>,
    /// Every token, automatic semicolons included, ending with `Eof`.
    pub tokens: Vec<Token>,
}

impl ParseOutput {
    /// Returns true if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parses `source` into a [`Program`].
///
/// Never fails: diagnostics are returned alongside a tree in which
/// unparseable code is represented by error nodes.
#[must_use]
pub fn parse(source: &SourceBuffer, options: &ParseOptions) -> ParseOutput {
    let _span = tracing::debug_span!(
        "parse",
        file = %source.name(),
        dialect = %options.dialect,
    )
    .entered();
    tracing::debug!(bytes = source.len(), "parsing");

    let scanner = Scanner::new(source.text(), options.dialect);
    let mut parser = Parser::new(TokenStream::new(scanner), source.clone(), options);
    let program = parser.parse_program(source.len());
    let output = parser.finish(program);

    tracing::debug!(
        tokens = output.tokens.len(),
        diagnostics = output.diagnostics.len(),
        statements = output.program.statements.len(),
        "parse finished"
    );
    output
}

// ============================================================================
// Binding Power
// ============================================================================

/// Binding power for infix operators.
///
/// Left-associative operators bind slightly tighter on the right, so
/// `a - b - c` parses as `(a - b) - c`. Right-associative ones bind tighter
/// on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BindingPower {
    pub left: u8,
    pub right: u8,
}

impl BindingPower {
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Binding power of the conditional operator `?`.
pub(super) const CONDITIONAL: BindingPower = BindingPower::right_assoc(30);

/// Returns the operator and binding power for a binary operator token.
///
/// Assignment and the conditional operator are handled separately.
pub(super) const fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, BindingPower)> {
    use BinaryOperator as Op;
    let entry = match kind {
        TokenKind::PipePipe => (Op::LogicalOr, BindingPower::left_assoc(40)),
        TokenKind::QuestionQuestion => (Op::Nullish, BindingPower::left_assoc(40)),
        TokenKind::AmpAmp => (Op::LogicalAnd, BindingPower::left_assoc(50)),
        TokenKind::Pipe => (Op::BitwiseOr, BindingPower::left_assoc(60)),
        TokenKind::Caret => (Op::BitwiseXor, BindingPower::left_assoc(70)),
        TokenKind::Amp => (Op::BitwiseAnd, BindingPower::left_assoc(80)),
        TokenKind::EqualEqual => (Op::LooseEqual, BindingPower::left_assoc(90)),
        TokenKind::BangEqual => (Op::LooseNotEqual, BindingPower::left_assoc(90)),
        TokenKind::EqualEqualEqual => (Op::StrictEqual, BindingPower::left_assoc(90)),
        TokenKind::BangEqualEqual => (Op::StrictNotEqual, BindingPower::left_assoc(90)),
        TokenKind::Less => (Op::Less, BindingPower::left_assoc(100)),
        TokenKind::LessEqual => (Op::LessEqual, BindingPower::left_assoc(100)),
        TokenKind::Greater => (Op::Greater, BindingPower::left_assoc(100)),
        TokenKind::GreaterEqual => (Op::GreaterEqual, BindingPower::left_assoc(100)),
        TokenKind::LessLess => (Op::ShiftLeft, BindingPower::left_assoc(110)),
        TokenKind::GreaterGreater => (Op::ShiftRight, BindingPower::left_assoc(110)),
        TokenKind::GreaterGreaterGreater => {
            (Op::UnsignedShiftRight, BindingPower::left_assoc(110))
        }
        TokenKind::Plus => (Op::Add, BindingPower::left_assoc(120)),
        TokenKind::Minus => (Op::Subtract, BindingPower::left_assoc(120)),
        TokenKind::Star => (Op::Multiply, BindingPower::left_assoc(130)),
        TokenKind::Slash => (Op::Divide, BindingPower::left_assoc(130)),
        TokenKind::Percent => (Op::Remainder, BindingPower::left_assoc(130)),
        TokenKind::StarStar => (Op::Exponent, BindingPower::right_assoc(140)),
        _ => return None,
    };
    Some(entry)
}

/// Binary operators the actor dialect defines.
pub(super) const fn is_actor_operator(operator: BinaryOperator) -> bool {
    use BinaryOperator as Op;
    matches!(
        operator,
        Op::LogicalAnd
            | Op::LogicalOr
            | Op::Add
            | Op::Subtract
            | Op::Multiply
            | Op::Divide
            | Op::Remainder
            | Op::Less
            | Op::LessEqual
            | Op::Greater
            | Op::GreaterEqual
            | Op::StrictEqual
            | Op::StrictNotEqual
    )
}

// ============================================================================
// Parser State
// ============================================================================

/// Returned by [`Parser::enter_nesting`] when the nesting limit is hit. The
/// error has already been reported and the offending group skipped.
#[derive(Debug, Clone, Copy)]
pub(super) struct TooDeep {
    pub span: Span,
}

impl TooDeep {
    pub const MESSAGE: &'static str = "nesting is too deep";

    pub fn expression(self) -> Expression {
        Expression::Error {
            message: Self::MESSAGE.into(),
            span: self.span,
        }
    }

    pub fn statement(self) -> Statement {
        Statement::Error {
            message: Self::MESSAGE.into(),
            span: self.span,
        }
    }

    pub fn ty(self) -> Type {
        Type::Error {
            message: Self::MESSAGE.into(),
            span: self.span,
        }
    }
}

/// The parser state.
pub(super) struct Parser<'src> {
    source: SourceBuffer,
    stream: TokenStream<'src>,
    reporter: Reporter,
    dialect: Dialect,
    max_nesting_depth: usize,
    nesting_depth: usize,
    /// Offset of the last "expected ..." error, so a token that several
    /// productions reject is reported once.
    last_expected_at: Option<u32>,
}

impl<'src> Parser<'src> {
    fn new(stream: TokenStream<'src>, source: SourceBuffer, options: &ParseOptions) -> Self {
        Self {
            reporter: Reporter::new(source.clone(), options.max_diagnostics),
            source,
            stream,
            dialect: options.dialect,
            max_nesting_depth: options.max_nesting_depth,
            nesting_depth: 0,
            last_expected_at: None,
        }
    }

    /// Parses the whole input.
    fn parse_program(&mut self, source_len: usize) -> Program {
        let hashbang = if self.check(TokenKind::HashBang) {
            let token = self.advance();
            Some(crate::ast::HashBang {
                text: token.lexeme().into(),
                span: token.span(),
            })
        } else {
            None
        };

        let mut statements = Vec::new();
        while !self.is_at_end() && !self.reporter.limit_reached() {
            let before = self.stream.position();
            let statement = self.parse_statement();
            statements.push(statement);
            if self.stream.position() == before {
                self.skip_unexpected();
            }
        }

        let end = u32::try_from(source_len).unwrap_or(u32::MAX);
        Program {
            hashbang,
            statements,
            span: Span::new(0, end),
        }
    }

    /// Reports the lexical errors nothing consumed and packages the output.
    fn finish(mut self, program: Program) -> ParseOutput {
        let eof_errors = self.stream.eof_errors();
        self.report_lex_errors(eof_errors);
        let (tokens, unconsumed) = self.stream.into_tokens();
        for error in unconsumed {
            self.reporter.report(Diagnostic::from(error));
        }
        ParseOutput {
            program,
            diagnostics: self.reporter.finish(),
            tokens,
        }
    }

    // ========================================================================
    // Token Access
    // ========================================================================

    /// The current token.
    pub(super) fn current_token(&mut self) -> &Token {
        self.stream.current()
    }

    /// Kind of the current token.
    pub(super) fn current_kind(&mut self) -> TokenKind {
        self.stream.kind_at(0)
    }

    /// Span of the current token.
    pub(super) fn current_span(&mut self) -> Span {
        self.stream.current().span()
    }

    /// Kind of the token `n` positions ahead.
    pub(super) fn peek_kind(&mut self, n: usize) -> TokenKind {
        self.stream.kind_at(n)
    }

    /// Returns true if the current token starts a new line.
    pub(super) fn at_new_line(&mut self) -> bool {
        self.stream.current().preceded_by_newline()
    }

    pub(super) fn is_at_end(&mut self) -> bool {
        self.current_kind().is_eof()
    }

    /// Consumes the current token and reports its lexical errors.
    pub(super) fn advance(&mut self) -> Token {
        let (token, errors) = self.stream.advance();
        self.report_lex_errors(errors);
        token
    }

    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(super) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.match_token(TokenKind::Keyword(keyword))
    }

    /// Consumes a token of the given kind, or reports an error naming
    /// `what` without consuming anything.
    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(what);
            None
        }
    }

    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Option<Token> {
        let what = ecow::eco_format!("`{}`", keyword.as_str());
        self.expect(TokenKind::Keyword(keyword), &what)
    }

    /// End offset of the last consumed token.
    pub(super) fn last_end(&self) -> u32 {
        self.stream.previous().map_or(0, |token| token.span().end())
    }

    /// Span from `start` to the end of the last consumed token. If nothing
    /// has been consumed since `start`, this is [`Self::missing_span`].
    pub(super) fn span_from(&self, start: Span) -> Span {
        let end = self.last_end();
        if end < start.end() {
            return self.missing_span();
        }
        Span::new(start.start(), end)
    }

    /// Zero-width span for a node the input does not contain. It sits at
    /// the end of the last consumed token, before any trivia, so it stays
    /// inside the node being built around it.
    pub(super) fn missing_span(&self) -> Span {
        Span::empty_at(self.last_end())
    }

    pub(super) const fn dialect(&self) -> Dialect {
        self.dialect
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Reports a syntax error at `span`.
    pub(super) fn error_at(&mut self, span: Span, message: impl Into<EcoString>) {
        self.reporter.report(Diagnostic::syntax(message, span));
    }

    /// Reports a syntax error at the current token.
    pub(super) fn error(&mut self, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.error_at(span, message);
    }

    /// Reports "expected `what`, found ..." at the current token. Nothing is
    /// reported at an `Eof` that follows an unterminated literal, since the
    /// lexical error already covers it, or at a token already reported.
    pub(super) fn error_expected(&mut self, what: &str) {
        if self.stream.at_truncated_eof() {
            return;
        }
        let at = self.current_span().start();
        if self.last_expected_at == Some(at) {
            return;
        }
        self.last_expected_at = Some(at);
        let found = self.current_kind().describe();
        self.error(ecow::eco_format!("expected {what}, found {found}"));
    }

    /// Reports a construct the current dialect does not have.
    pub(super) fn unavailable(&mut self, span: Span, what: &str) {
        let dialect = self.dialect;
        self.error_at(
            span,
            ecow::eco_format!("not available in the {dialect} dialect: {what}"),
        );
    }

    fn report_lex_errors(&mut self, errors: Vec<LexError>) {
        for error in errors {
            self.reporter.report(Diagnostic::from(error));
        }
    }

    // ========================================================================
    // Statement Terminators
    // ========================================================================

    /// Consumes `;`, or inserts an automatic semicolon where one is allowed.
    /// Reports an error and returns false otherwise.
    pub(super) fn consume_terminator(&mut self) -> bool {
        if self.match_token(TokenKind::Semicolon) {
            return true;
        }
        if self.stream.insert_automatic_semicolon().is_some() {
            return true;
        }
        self.error_expected("`;`");
        false
    }

    // ========================================================================
    // Delimited Lists
    // ========================================================================

    /// Returns true at the closing token of a list. A `>` closing a type
    /// list is re-scanned first so `>>` splits.
    pub(super) fn at_closer(&mut self, close: TokenKind) -> bool {
        if close == TokenKind::Greater {
            self.stream.relex(LexGoal::TypeArguments);
        }
        self.check(close)
    }

    /// Parses `item (, item)* ,?` followed by `close`, which is consumed.
    ///
    /// `item` returns `None` after reporting its own error; the list then
    /// skips ahead to `close` without further reports.
    pub(super) fn parse_delimited<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let closer = close.describe();
        let mut items = Vec::new();
        let mut failed = false;
        loop {
            if self.at_closer(close) || self.is_at_end() {
                break;
            }
            let parsed = item(self);
            let ok = parsed.is_some();
            items.extend(parsed);
            if self.match_token(TokenKind::Comma) {
                continue;
            }
            if !self.at_closer(close) {
                if ok {
                    self.error_expected(&ecow::eco_format!("`,` or {closer}"));
                }
                failed = true;
                self.recover_to(close);
            }
            break;
        }
        if !self.match_token(close) && !failed {
            self.error_expected(&closer);
        }
        items
    }

    /// Skips tokens, and whole bracketed groups, until `close` or a point
    /// where the enclosing construct cannot continue.
    pub(super) fn recover_to(&mut self, close: TokenKind) {
        loop {
            if self.at_closer(close) {
                return;
            }
            match self.current_kind() {
                TokenKind::Eof | TokenKind::Semicolon => return,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => return,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    self.skip_balanced();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Error Recovery
    // ========================================================================

    /// Returns true at a point where a statement may resume.
    pub(super) fn at_recovery_point(&mut self) -> bool {
        let token = self.stream.current();
        match token.kind() {
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof => true,
            TokenKind::Keyword(keyword) => keyword.starts_statement(),
            _ => token.preceded_by_newline(),
        }
    }

    /// Skips tokens up to the next statement boundary. A `;` boundary is
    /// consumed.
    pub(super) fn synchronize(&mut self) {
        let start = self.current_span();
        let mut skipped = 0_usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof | TokenKind::RightBrace => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                _ if skipped > 0 && self.at_recovery_point() => break,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    self.skip_balanced();
                }
                _ => {
                    self.advance();
                }
            }
            skipped += 1;
        }
        if skipped > 0 {
            tracing::trace!(from = start.start(), to = self.last_end(), "recovered");
        }
    }

    /// Consumes one token that no production accepted, reporting it.
    pub(super) fn skip_unexpected(&mut self) {
        if self.is_at_end() {
            return;
        }
        let kind = self.current_kind();
        let span = self.current_span();
        self.advance();
        self.error_at(span, ecow::eco_format!("unexpected {}", kind.describe()));
    }

    /// Skips a bracketed group (or one token) without parsing it.
    pub(super) fn skip_balanced(&mut self) {
        let mut depth = 0_usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::TemplateSubstitutionStart => depth += 1,
                TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::TemplateSubstitutionEnd => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
            if depth == 0 {
                return;
            }
        }
    }

    /// Returns true if the current token opens a parenthesized group whose
    /// closing `)` is followed by a token accepted by `after`.
    pub(super) fn paren_group_followed_by(&mut self, after: impl Fn(TokenKind) -> bool) -> bool {
        if !self.check(TokenKind::LeftParen) {
            return false;
        }
        let mut depth = 0_usize;
        let mut n = 0;
        loop {
            match self.peek_kind(n) {
                TokenKind::Eof => return false,
                TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::TemplateSubstitutionStart => depth += 1,
                TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::TemplateSubstitutionEnd => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return after(self.peek_kind(n + 1));
                    }
                }
                _ => {}
            }
            n += 1;
        }
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Enters one level of expression, type or statement nesting.
    ///
    /// At the limit, reports an error, skips the construct at the cursor and
    /// returns `Err`.
    pub(super) fn enter_nesting(&mut self) -> Result<(), TooDeep> {
        if self.nesting_depth >= self.max_nesting_depth {
            let start = self.current_span();
            self.error_at(start, TooDeep::MESSAGE);
            self.skip_balanced();
            return Err(TooDeep {
                span: self.span_from(start),
            });
        }
        self.nesting_depth += 1;
        Ok(())
    }

    pub(super) fn leave_nesting(&mut self) {
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Parses an identifier. Reserved words are consumed and reported.
    pub(super) fn parse_identifier(&mut self, what: &str) -> Option<Identifier> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier => {
                self.advance();
                Some(Identifier::new(token.lexeme(), token.span()))
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

    pub(super) fn reserved_word_error(&mut self, keyword: Keyword, span: Span) {
        self.error_at(
            span,
            ecow::eco_format!(
                "`{}` is a reserved word and cannot be used as an identifier",
                keyword.as_str()
            ),
        );
    }

    /// Parses an action identifier such as `@tick`, storing the name
    /// without the `@`.
    pub(super) fn parse_action_identifier(&mut self, what: &str) -> Option<Identifier> {
        let token = self.expect(TokenKind::ActionIdentifier, what)?;
        Some(action_name(&token))
    }

    /// Parses an object or type property name: an identifier, reserved
    /// word, action identifier, string or number.
    pub(super) fn parse_property_key(&mut self) -> Option<PropertyKey> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                self.advance();
                Some(PropertyKey::Identifier(Identifier::new(
                    token.lexeme(),
                    token.span(),
                )))
            }
            TokenKind::ActionIdentifier => {
                self.advance();
                Some(PropertyKey::Action(action_name(&token)))
            }
            TokenKind::Number => {
                self.advance();
                Some(PropertyKey::Number {
                    raw: token.lexeme().into(),
                    span: token.span(),
                })
            }
            TokenKind::StringStart => self.parse_string_literal().map(PropertyKey::String),
            _ => {
                self.error_expected("property name");
                None
            }
        }
    }

    /// Parses a string literal from its pieces, cooking escapes.
    pub(super) fn parse_string_literal(&mut self) -> Option<StringLiteral> {
        let start = self.expect(TokenKind::StringStart, "string")?.span();
        let mut value = String::new();
        loop {
            let token = self.current_token().clone();
            match token.kind() {
                TokenKind::StringFragment => value.push_str(token.lexeme()),
                TokenKind::EscapeSequence => cook_escape(token.lexeme(), &mut value),
                TokenKind::StringEnd => {
                    self.advance();
                    break;
                }
                _ => break,
            }
            self.advance();
        }
        let span = self.span_from(start);
        Some(StringLiteral {
            value: value.into(),
            raw: self.raw_text(span),
            span,
        })
    }

    /// Source text covered by `span`.
    pub(super) fn raw_text(&self, span: Span) -> EcoString {
        self.source.slice(span).into()
    }
}

/// Builds an identifier from an `@name` token, dropping the `@`.
pub(super) fn action_name(token: &Token) -> Identifier {
    let name = token.lexeme().strip_prefix('@').unwrap_or(token.lexeme());
    Identifier::new(name, token.span())
}

/// Appends the value of one escape sequence (`\n`, `\x41`, `\u{1F600}`,
/// `\` + line terminator, ...) to `out`. Invalid escapes, which the scanner
/// has already reported, contribute their characters literally.
pub(super) fn cook_escape(raw: &str, out: &mut String) {
    let Some(body) = raw.strip_prefix('\\') else {
        out.push_str(raw);
        return;
    };
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let rest = chars.as_str();
    let decoded = match first {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => return,
        '0'..='7' => u32::from_str_radix(body, 8).ok().and_then(char::from_u32),
        'x' => u32::from_str_radix(rest, 16).ok().and_then(char::from_u32),
        'u' => {
            let digits = rest
                .strip_prefix('{')
                .and_then(|r| r.strip_suffix('}'))
                .unwrap_or(rest);
            u32::from_str_radix(digits, 16)
                .ok()
                .map(|code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        }
        _ => {
            out.push_str(body);
            return;
        }
    };
    match decoded {
        Some(c) => out.push(c),
        None => out.push_str(body),
    }
}
