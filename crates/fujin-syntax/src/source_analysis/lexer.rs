// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Fujin source code.
//!
//! The [`Scanner`] converts source text into [`Token`]s one at a time. It is
//! hand-written because several lexical decisions depend on context that a
//! regular lexer cannot see:
//!
//! - **Regex vs division**: `/` after an operand is division, anywhere else
//!   (full dialect only) it opens a regex literal.
//! - **Template nesting**: each `${` pushes a frame with its own brace
//!   counter, so `}` closing a nested object literal does not end the
//!   substitution.
//! - **Lexical goals**: the parser asks for raw FJX text, single `>` inside
//!   tags and type argument lists, through [`LexGoal`].
//!
//! # Design Principles
//!
//! - **Error recovery**: never panic on malformed input; record a
//!   [`LexError`] and keep scanning
//! - **Trivia preservation**: whitespace and comments ride along as leading
//!   trivia so the token sequence reproduces the source exactly
//! - **Restartable**: the whole scanner state is a cloneable [`ScanState`],
//!   which is what lets the token stream roll back and re-scan
//!
//! An unterminated string, template, regex or block comment is reported at
//! its opening delimiter; the remainder of the input becomes
//! [`Trivia::Skipped`] on the final [`TokenKind::Eof`].
//!
//! # Example
//!
//! ```
//! use fujin_syntax::source_analysis::{Dialect, TokenKind, lex};
//!
//! let kinds: Vec<_> = lex("a / b", Dialect::Full).iter().map(|t| t.kind()).collect();
//! assert_eq!(kinds, [TokenKind::Identifier, TokenKind::Slash, TokenKind::Identifier]);
//! ```

use ecow::EcoString;

use super::{
    Dialect, Keyword, LexError, LexErrorKind, Position, Span, Token, TokenKind, Trivia,
    is_line_terminator,
};

/// What kind of token the parser expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexGoal {
    /// Ordinary code.
    #[default]
    Code,
    /// Children of an FJX element: raw text up to `{` or `<`, no trivia.
    FjxText,
    /// Inside an FJX tag: `>` is never merged and `/>` is one token.
    FjxTag,
    /// Closing a type argument or parameter list: `>` is never merged.
    TypeArguments,
}

/// One frame of the scanner's mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    /// Inside `${ ... }`, counting unmatched `{`.
    Substitution {
        braces: u32,
    },
    String {
        quote: char,
    },
    /// Inside a template literal opened at byte `open`.
    Template {
        open: u32,
    },
}

/// A snapshot of everything the scanner knows.
///
/// Restoring a snapshot and scanning again yields exactly the same tokens,
/// unless a different [`LexGoal`] is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    offset: usize,
    line: u32,
    column: u32,
    modes: Vec<Mode>,
    last_significant: Option<TokenKind>,
    regex_flags_next: bool,
    finished: bool,
}

impl ScanState {
    fn initial() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
            modes: vec![Mode::Code],
            last_significant: None,
            regex_flags_next: false,
            finished: false,
        }
    }

    /// Byte offset of the next unscanned character.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// A context-sensitive scanner for one source text.
pub struct Scanner<'src> {
    source: &'src str,
    dialect: Dialect,
    state: ScanState,
    errors: Vec<LexError>,
}

impl std::fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("dialect", &self.dialect)
            .field("offset", &self.state.offset)
            .field("modes", &self.state.modes)
            .finish_non_exhaustive()
    }
}

impl<'src> Scanner<'src> {
    /// Creates a scanner positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            state: ScanState::initial(),
            errors: Vec::new(),
        }
    }

    /// The dialect being scanned.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state.clone()
    }

    /// Rewinds (or fast-forwards) to a snapshot taken from this scanner.
    pub fn restore(&mut self, state: ScanState) {
        self.state = state;
        self.errors.clear();
    }

    /// Scans the next token under `goal`, returning it together with the
    /// lexical errors found while scanning it.
    pub fn next_token(&mut self, goal: LexGoal) -> (Token, Vec<LexError>) {
        let token = self.scan(goal);
        if !token.kind().is_eof() {
            self.state.last_significant = Some(token.kind());
        }
        (token, std::mem::take(&mut self.errors))
    }

    // ========================================================================
    // Character access
    // ========================================================================

    fn rest(&self) -> &'src str {
        self.source.get(self.state.offset..).unwrap_or("")
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peeks `n` characters past the next one (`peek_nth(0) == peek()`).
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.state.offset += c.len_utf8();
        if c == '\r' && self.peek() == Some('\n') {
            self.state.column += 1;
        } else if is_line_terminator(c) {
            self.state.line += 1;
            self.state.column = 1;
        } else {
            self.state.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn offset_u32(&self) -> u32 {
        self.state.offset as u32
    }

    fn cursor_position(&self) -> Position {
        Position {
            line: self.state.line,
            column: self.state.column,
            offset: self.offset_u32(),
        }
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.offset_u32())
    }

    fn text_for(&self, span: Span) -> &'src str {
        self.source.get(span.as_range()).unwrap_or("")
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        self.errors.push(LexError::new(kind, span));
    }

    fn mode(&self) -> Mode {
        self.state.modes.last().copied().unwrap_or(Mode::Code)
    }

    fn pop_mode(&mut self) {
        if self.state.modes.len() > 1 {
            self.state.modes.pop();
        }
    }

    fn make_token(
        &self,
        kind: TokenKind,
        start: u32,
        start_position: Position,
        trivia: Vec<Trivia>,
    ) -> Token {
        let span = self.span_from(start);
        Token::new(
            kind,
            self.text_for(span),
            span,
            (start_position, self.cursor_position()),
            trivia,
        )
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    fn scan(&mut self, goal: LexGoal) -> Token {
        if self.state.finished {
            return self.eof_token(Vec::new());
        }

        match self.mode() {
            Mode::String { quote } => return self.scan_string_part(quote),
            Mode::Template { open } => return self.scan_template_part(open),
            Mode::Code | Mode::Substitution { .. } => {}
        }

        if std::mem::take(&mut self.state.regex_flags_next)
            && self.peek().is_some_and(is_identifier_part)
        {
            let start = self.offset_u32();
            let position = self.cursor_position();
            self.advance_while(is_identifier_part);
            return self.make_token(TokenKind::RegexFlags, start, position, Vec::new());
        }

        if goal == LexGoal::FjxText
            && let Some(token) = self.scan_fjx_text()
        {
            return token;
        }

        if self.state.offset == 0 && self.starts_with("#!") {
            let position = self.cursor_position();
            self.advance_while(|c| !is_line_terminator(c));
            return self.make_token(TokenKind::HashBang, 0, position, Vec::new());
        }

        let mut trivia = match self.skip_trivia() {
            Ok(trivia) => trivia,
            Err(trivia) => return self.finish(trivia),
        };

        let start = self.offset_u32();
        let position = self.cursor_position();
        let Some(c) = self.peek() else {
            self.report_open_templates();
            return self.eof_token(trivia);
        };

        match self.scan_kind(c, goal) {
            Some(kind) => self.make_token(kind, start, position, trivia),
            None => {
                // Unterminated literal: everything from its opening delimiter
                // onwards is skipped.
                self.advance_while(|_| true);
                let text = self.text_for(self.span_from(start));
                trivia.push(Trivia::Skipped(EcoString::from(text)));
                self.finish(trivia)
            }
        }
    }

    fn eof_token(&mut self, trivia: Vec<Trivia>) -> Token {
        let start = self.offset_u32();
        let position = self.cursor_position();
        self.make_token(TokenKind::Eof, start, position, trivia)
    }

    /// Produces the final `Eof` after giving up on the rest of the input.
    fn finish(&mut self, trivia: Vec<Trivia>) -> Token {
        self.advance_while(|_| true);
        self.state.finished = true;
        self.eof_token(trivia)
    }

    /// Reports templates still open at end of input.
    fn report_open_templates(&mut self) {
        let open = self.state.modes.iter().rev().find_map(|mode| match mode {
            Mode::Template { open } => Some(*open),
            _ => None,
        });
        if let Some(open) = open {
            self.error(
                LexErrorKind::UnterminatedTemplate,
                Span::new(open, open + 1),
            );
            self.state.modes.truncate(1);
            self.state.finished = true;
        }
    }

    /// Scans one token starting with `c`. Returns `None` when an
    /// unterminated literal swallowed the rest of the input.
    fn scan_kind(&mut self, c: char, goal: LexGoal) -> Option<TokenKind> {
        let kind = match c {
            '"' | '\'' => return self.scan_string_start(c),
            '`' if self.dialect.has_templates() => {
                let open = self.offset_u32();
                self.advance();
                self.state.modes.push(Mode::Template { open });
                TokenKind::TemplateStart
            }
            '0'..='9' => self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            '.' if self.starts_with("...") => self.punct(3, TokenKind::Ellipsis),
            '.' => self.punct(1, TokenKind::Dot),
            '(' => self.punct(1, TokenKind::LeftParen),
            ')' => self.punct(1, TokenKind::RightParen),
            '[' => self.punct(1, TokenKind::LeftBracket),
            ']' => self.punct(1, TokenKind::RightBracket),
            '{' => {
                if let Some(Mode::Substitution { braces }) = self.state.modes.last_mut() {
                    *braces += 1;
                }
                self.punct(1, TokenKind::LeftBrace)
            }
            '}' => self.scan_right_brace(),
            ';' => self.punct(1, TokenKind::Semicolon),
            ',' => self.punct(1, TokenKind::Comma),
            ':' => self.punct(1, TokenKind::Colon),
            '~' => self.punct(1, TokenKind::Tilde),
            '@' if self.peek_nth(1).is_some_and(is_identifier_part) => {
                self.advance();
                self.advance_while(is_identifier_part);
                TokenKind::ActionIdentifier
            }
            '@' => self.punct(1, TokenKind::At),
            '?' => self.scan_question(),
            '/' => return self.scan_slash(goal),
            '<' => self.scan_less(goal),
            '>' => self.scan_greater(goal),
            _ => match self.scan_operator() {
                Some(kind) => kind,
                None if c == '\\' || is_identifier_start(c) => self.scan_identifier(),
                None => {
                    let start = self.offset_u32();
                    self.advance();
                    self.error(
                        LexErrorKind::UnexpectedCharacter(c),
                        self.span_from(start),
                    );
                    TokenKind::Error
                }
            },
        };
        Some(kind)
    }

    fn punct(&mut self, len: usize, kind: TokenKind) -> TokenKind {
        self.advance_by(len);
        kind
    }

    /// Longest-match table for operators without context rules.
    fn scan_operator(&mut self) -> Option<TokenKind> {
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("===", TokenKind::EqualEqualEqual),
            ("!==", TokenKind::BangEqualEqual),
            ("**=", TokenKind::StarStarEqual),
            ("&&=", TokenKind::AmpAmpEqual),
            ("||=", TokenKind::PipePipeEqual),
            ("==", TokenKind::EqualEqual),
            ("=>", TokenKind::Arrow),
            ("!=", TokenKind::BangEqual),
            ("++", TokenKind::PlusPlus),
            ("+=", TokenKind::PlusEqual),
            ("--", TokenKind::MinusMinus),
            ("-=", TokenKind::MinusEqual),
            ("**", TokenKind::StarStar),
            ("*=", TokenKind::StarEqual),
            ("%=", TokenKind::PercentEqual),
            ("&&", TokenKind::AmpAmp),
            ("&=", TokenKind::AmpEqual),
            ("||", TokenKind::PipePipe),
            ("|=", TokenKind::PipeEqual),
            ("^=", TokenKind::CaretEqual),
            ("=", TokenKind::Equal),
            ("!", TokenKind::Bang),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("%", TokenKind::Percent),
            ("&", TokenKind::Amp),
            ("|", TokenKind::Pipe),
            ("^", TokenKind::Caret),
        ];
        let rest = self.rest();
        let &(text, kind) = OPERATORS.iter().find(|(text, _)| rest.starts_with(text))?;
        self.advance_by(text.len());
        Some(kind)
    }

    fn scan_right_brace(&mut self) -> TokenKind {
        match self.state.modes.last_mut() {
            Some(Mode::Substitution { braces: 0 }) => {
                self.advance();
                self.pop_mode();
                TokenKind::TemplateSubstitutionEnd
            }
            Some(Mode::Substitution { braces }) => {
                *braces -= 1;
                self.punct(1, TokenKind::RightBrace)
            }
            _ => self.punct(1, TokenKind::RightBrace),
        }
    }

    /// `?.` is optional chaining unless a digit follows the dot
    /// (`a ? .5 : b` is a conditional).
    fn scan_question(&mut self) -> TokenKind {
        if self.starts_with("?.") && !self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()) {
            self.punct(2, TokenKind::QuestionDot)
        } else if self.starts_with("??=") {
            self.punct(3, TokenKind::QuestionQuestionEqual)
        } else if self.starts_with("??") {
            self.punct(2, TokenKind::QuestionQuestion)
        } else {
            self.punct(1, TokenKind::Question)
        }
    }

    fn scan_slash(&mut self, goal: LexGoal) -> Option<TokenKind> {
        if goal == LexGoal::FjxTag && self.starts_with("/>") {
            return Some(self.punct(2, TokenKind::SlashGreater));
        }
        let after_operand = self
            .state
            .last_significant
            .is_some_and(TokenKind::ends_operand);
        if self.dialect.has_regex() && !after_operand {
            return self.scan_regex();
        }
        if self.starts_with("/=") {
            Some(self.punct(2, TokenKind::SlashEqual))
        } else {
            Some(self.punct(1, TokenKind::Slash))
        }
    }

    fn scan_less(&mut self, goal: LexGoal) -> TokenKind {
        if goal == LexGoal::FjxText && self.starts_with("</") {
            self.punct(2, TokenKind::LessSlash)
        } else if goal != LexGoal::Code {
            self.punct(1, TokenKind::Less)
        } else if self.starts_with("<<=") {
            self.punct(3, TokenKind::LessLessEqual)
        } else if self.starts_with("<<") {
            self.punct(2, TokenKind::LessLess)
        } else if self.starts_with("<=") {
            self.punct(2, TokenKind::LessEqual)
        } else {
            self.punct(1, TokenKind::Less)
        }
    }

    fn scan_greater(&mut self, goal: LexGoal) -> TokenKind {
        if goal != LexGoal::Code {
            return self.punct(1, TokenKind::Greater);
        }
        if self.starts_with(">>>=") {
            self.punct(4, TokenKind::GreaterGreaterGreaterEqual)
        } else if self.starts_with(">>>") {
            self.punct(3, TokenKind::GreaterGreaterGreater)
        } else if self.starts_with(">>=") {
            self.punct(3, TokenKind::GreaterGreaterEqual)
        } else if self.starts_with(">>") {
            self.punct(2, TokenKind::GreaterGreater)
        } else if self.starts_with(">=") {
            self.punct(2, TokenKind::GreaterEqual)
        } else {
            self.punct(1, TokenKind::Greater)
        }
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Collects whitespace and comments. An unterminated block comment
    /// returns `Err` with the comment as skipped text.
    fn skip_trivia(&mut self) -> Result<Vec<Trivia>, Vec<Trivia>> {
        let mut trivia = Vec::new();
        loop {
            let start = self.offset_u32();
            match self.peek() {
                Some(c) if is_trivia_whitespace(c) => {
                    self.advance_while(is_trivia_whitespace);
                    let text = self.text_for(self.span_from(start));
                    trivia.push(Trivia::Whitespace(EcoString::from(text)));
                }
                Some('/') if self.peek_nth(1) == Some('/') => {
                    self.advance_while(|c| !is_line_terminator(c));
                    let text = self.text_for(self.span_from(start));
                    trivia.push(Trivia::LineComment(EcoString::from(text)));
                }
                Some('/') if self.peek_nth(1) == Some('*') => {
                    self.advance_by(2);
                    loop {
                        if self.starts_with("*/") {
                            self.advance_by(2);
                            break;
                        }
                        if self.advance().is_none() {
                            self.error(
                                LexErrorKind::UnterminatedComment,
                                Span::new(start, start + 2),
                            );
                            let text = self.text_for(self.span_from(start));
                            trivia.push(Trivia::Skipped(EcoString::from(text)));
                            return Err(trivia);
                        }
                    }
                    let text = self.text_for(self.span_from(start));
                    trivia.push(Trivia::BlockComment(EcoString::from(text)));
                }
                _ => return Ok(trivia),
            }
        }
    }

    // ========================================================================
    // Strings and templates
    // ========================================================================

    /// Opens a string literal, or gives up on the rest of the input if it
    /// never closes on this line.
    fn scan_string_start(&mut self, quote: char) -> Option<TokenKind> {
        let start = self.offset_u32();
        if !self.string_terminates(quote) {
            self.error(
                LexErrorKind::UnterminatedString,
                Span::new(start, start + 1),
            );
            return None;
        }
        self.advance();
        self.state.modes.push(Mode::String { quote });
        Some(TokenKind::StringStart)
    }

    /// Looks ahead for the closing quote, honouring escapes and line
    /// continuations.
    fn string_terminates(&self, quote: char) -> bool {
        let mut chars = self.rest().chars().skip(1).peekable();
        while let Some(c) = chars.next() {
            match c {
                c if c == quote => return true,
                '\n' | '\r' => return false,
                '\\' => match chars.next() {
                    None => return false,
                    Some('\r') => {
                        chars.next_if_eq(&'\n');
                    }
                    Some(_) => {}
                },
                _ => {}
            }
        }
        false
    }

    fn scan_string_part(&mut self, quote: char) -> Token {
        let start = self.offset_u32();
        let position = self.cursor_position();
        let kind = match self.peek() {
            Some(c) if c == quote => {
                self.advance();
                self.pop_mode();
                TokenKind::StringEnd
            }
            Some('\\') => {
                self.scan_escape();
                TokenKind::EscapeSequence
            }
            Some(_) => {
                self.advance_while(|c| c != quote && c != '\\' && !matches!(c, '\n' | '\r'));
                if self.offset_u32() == start {
                    // A bare line terminator cannot appear here because the
                    // string was checked on entry; treat it as the end.
                    self.pop_mode();
                    return self.scan(LexGoal::Code);
                }
                TokenKind::StringFragment
            }
            None => {
                self.pop_mode();
                return self.eof_token(Vec::new());
            }
        };
        self.make_token(kind, start, position, Vec::new())
    }

    fn scan_template_part(&mut self, open: u32) -> Token {
        let start = self.offset_u32();
        let position = self.cursor_position();
        let kind = match self.peek() {
            None => {
                self.error(
                    LexErrorKind::UnterminatedTemplate,
                    Span::new(open, open + 1),
                );
                self.state.modes.truncate(1);
                return self.finish(Vec::new());
            }
            Some('`') => {
                self.advance();
                self.pop_mode();
                TokenKind::TemplateEnd
            }
            Some('$') if self.peek_nth(1) == Some('{') => {
                self.advance_by(2);
                self.state.modes.push(Mode::Substitution { braces: 0 });
                TokenKind::TemplateSubstitutionStart
            }
            Some('\\') => {
                self.scan_escape();
                TokenKind::EscapeSequence
            }
            Some(_) => {
                while let Some(c) = self.peek() {
                    if c == '`' || c == '\\' || self.starts_with("${") {
                        break;
                    }
                    self.advance();
                }
                TokenKind::TemplateChars
            }
        };
        self.make_token(kind, start, position, Vec::new())
    }

    /// Scans one escape sequence starting at `\`.
    ///
    /// Recognised: single characters, 1-3 octal digits, `\xHH`, `\uHHHH`,
    /// `\u{H+}` up to U+10FFFF and line continuations. Malformed `\x`/`\u`
    /// forms are reported but still produce an escape token.
    fn scan_escape(&mut self) {
        let start = self.offset_u32();
        self.advance();
        let valid = match self.peek() {
            None => false,
            Some('x') => {
                self.advance();
                self.scan_hex_digits(2) == 2
            }
            Some('u') => {
                self.advance();
                self.scan_unicode_escape_body()
            }
            Some('0'..='7') => {
                let mut count = 0;
                while count < 3 && self.peek().is_some_and(|c| matches!(c, '0'..='7')) {
                    self.advance();
                    count += 1;
                }
                true
            }
            Some('\r') => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                true
            }
            Some(_) => {
                self.advance();
                true
            }
        };
        if !valid {
            let span = self.span_from(start);
            let text = self.text_for(span).to_string();
            self.error(LexErrorKind::InvalidEscape(text), span);
        }
    }

    /// Consumes up to `max` hex digits and returns how many were consumed.
    fn scan_hex_digits(&mut self, max: usize) -> usize {
        let mut count = 0;
        while count < max && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.advance();
            count += 1;
        }
        count
    }

    /// The part of a `\u` escape after the `u`.
    fn scan_unicode_escape_body(&mut self) -> bool {
        if self.peek() != Some('{') {
            return self.scan_hex_digits(4) == 4;
        }
        self.advance();
        let digits_start = self.state.offset;
        let count = self.scan_hex_digits(usize::MAX);
        let digits = self.source.get(digits_start..self.state.offset).unwrap_or("");
        let in_range = u32::from_str_radix(digits, 16).is_ok_and(|value| value <= 0x0010_FFFF);
        let closed = self.peek() == Some('}');
        if closed {
            self.advance();
        }
        count > 0 && in_range && closed
    }

    // ========================================================================
    // Numbers, regex, identifiers, FJX text
    // ========================================================================

    /// Scans a numeric literal: decimal with optional fraction and exponent,
    /// or `0x`/`0b`/`0o` prefixed, all with `_` separators between digits.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.offset_u32();
        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('b' | 'B')) => 2,
            (Some('0'), Some('o' | 'O')) => 8,
            _ => 10,
        };

        let mut valid = if radix == 10 {
            self.scan_decimal_literal()
        } else {
            self.advance_by(2);
            self.scan_digits(radix)
        };

        if self.peek().is_some_and(is_identifier_part) || self.peek() == Some('\\') {
            self.advance_while(is_identifier_part);
            valid = false;
        }

        if !valid {
            let span = self.span_from(start);
            let text = self.text_for(span).to_string();
            self.error(LexErrorKind::InvalidNumber(text), span);
        }
        TokenKind::Number
    }

    fn scan_decimal_literal(&mut self) -> bool {
        let mut valid = true;
        if self.peek() == Some('.') {
            self.advance();
            valid &= self.scan_digits(10);
        } else {
            valid &= self.scan_digits(10);
            if self.peek() == Some('.') && self.peek_nth(1) != Some('.') {
                self.advance();
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    valid &= self.scan_digits(10);
                }
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance_by(digit_at);
                valid &= self.scan_digits(10);
            }
        }
        valid
    }

    /// Consumes a digit run in `radix`, allowing single `_` separators
    /// between digits. Decimal digits outside the radix are consumed and
    /// make the literal invalid.
    fn scan_digits(&mut self, radix: u32) -> bool {
        let mut valid = true;
        let mut any = false;
        let mut after_separator = false;
        while let Some(c) = self.peek() {
            if c.is_digit(radix) {
                any = true;
                after_separator = false;
            } else if c == '_' {
                if !any || after_separator {
                    valid = false;
                }
                after_separator = true;
            } else if c.is_ascii_digit() {
                valid = false;
            } else {
                break;
            }
            self.advance();
        }
        valid && any && !after_separator
    }

    /// Scans a regex literal body and its closing slash. Flags follow as a
    /// separate [`TokenKind::RegexFlags`] token.
    fn scan_regex(&mut self) -> Option<TokenKind> {
        let start = self.offset_u32();
        self.advance();
        let mut in_class = false;
        loop {
            match self.peek() {
                None => break,
                Some(c) if is_line_terminator(c) => break,
                Some('\\') => {
                    self.advance();
                    if self.peek().is_none_or(is_line_terminator) {
                        break;
                    }
                    self.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    self.state.regex_flags_next = true;
                    return Some(TokenKind::RegexPattern);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        self.error(
            LexErrorKind::UnterminatedRegex,
            Span::new(start, start + 1),
        );
        None
    }

    /// Scans an identifier (possibly with `\u` escapes) and classifies
    /// reserved words.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.offset_u32();
        let mut valid = true;
        loop {
            match self.peek() {
                Some('\\') => {
                    let escape_start = self.offset_u32();
                    self.advance();
                    let ok = self.peek() == Some('u') && {
                        self.advance();
                        self.scan_unicode_escape_body()
                    };
                    if !ok {
                        let span = self.span_from(escape_start);
                        let text = self.text_for(span).to_string();
                        self.error(LexErrorKind::InvalidEscape(text), span);
                        valid = false;
                    }
                }
                Some(c) if is_identifier_part(c) => {
                    self.advance();
                }
                _ => break,
            }
        }
        let text = self.text_for(self.span_from(start));
        match Keyword::lookup(text, self.dialect) {
            Some(keyword) if valid => TokenKind::Keyword(keyword),
            _ => TokenKind::Identifier,
        }
    }

    /// Raw FJX text up to the next `{` or `<`. Returns `None` if the text
    /// would be empty.
    fn scan_fjx_text(&mut self) -> Option<Token> {
        let start = self.offset_u32();
        let position = self.cursor_position();
        self.advance_while(|c| c != '{' && c != '<');
        if self.offset_u32() == start {
            return None;
        }
        Some(self.make_token(TokenKind::FjxText, start, position, Vec::new()))
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields tokens under [`LexGoal::Code`], stopping before `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.state.finished && self.rest().is_empty() {
            return None;
        }
        let (token, _) = self.next_token(LexGoal::Code);
        if token.kind().is_eof() {
            self.state.finished = true;
            None
        } else {
            Some(token)
        }
    }
}

// ============================================================================
// Character classes
// ============================================================================

/// Whitespace skipped between tokens: Unicode `White_Space` plus the
/// zero-width no-break space, word joiner and zero-width space.
#[must_use]
pub fn is_trivia_whitespace(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{FEFF}' | '\u{2060}' | '\u{200B}')
}

/// Invisible formatting characters that may not appear in identifiers:
/// zero-width characters, bidirectional overrides and isolates.
#[must_use]
pub const fn is_invisible_format(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}

/// Returns true if `c` may continue an identifier.
#[must_use]
pub fn is_identifier_part(c: char) -> bool {
    !(c.is_control()
        || c.is_whitespace()
        || is_invisible_format(c)
        || matches!(
            c,
            ':' | ';'
                | '`'
                | '"'
                | '\''
                | '@'
                | '#'
                | '.'
                | ','
                | '|'
                | '^'
                | '&'
                | '<'
                | '='
                | '>'
                | '+'
                | '-'
                | '*'
                | '/'
                | '\\'
                | '%'
                | '?'
                | '!'
                | '~'
                | '('
                | ')'
                | '['
                | ']'
                | '{'
                | '}'
        ))
}

/// Returns true if `c` may start an identifier.
#[must_use]
pub fn is_identifier_start(c: char) -> bool {
    !c.is_ascii_digit() && is_identifier_part(c)
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Scans all of `source` under [`LexGoal::Code`], returning every token
/// (ending with `Eof`) and every lexical error.
///
/// Without a parser there is no automatic semicolon insertion and no FJX
/// text scanning.
#[must_use]
pub fn tokenize(source: &str, dialect: Dialect) -> (Vec<Token>, Vec<LexError>) {
    let mut scanner = Scanner::new(source, dialect);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    loop {
        let (token, token_errors) = scanner.next_token(LexGoal::Code);
        errors.extend(token_errors);
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return (tokens, errors);
        }
    }
}

/// Scans `source`, excluding the final `Eof`.
#[must_use]
pub fn lex(source: &str, dialect: Dialect) -> Vec<Token> {
    let mut tokens = lex_with_eof(source, dialect);
    tokens.pop();
    tokens
}

/// Scans `source`, including the final `Eof`.
#[must_use]
pub fn lex_with_eof(source: &str, dialect: Dialect) -> Vec<Token> {
    tokenize(source, dialect).0
}
