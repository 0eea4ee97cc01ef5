// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! A lazy, restartable token buffer between the scanner and the parser.
//!
//! Tokens are scanned on demand and buffered together with the scanner
//! state that preceded them. That buffer gives the parser:
//!
//! - **Lookahead** with [`TokenStream::peek_nth`], scanned under
//!   [`LexGoal::Code`].
//! - **Re-scanning** with [`TokenStream::relex`]: when the parser needs the
//!   current token under a different goal (FJX text, a single `>` closing a
//!   type argument list), the buffer is cut at the cursor and the scanner is
//!   rewound to the saved state.
//! - **Checkpoints**: [`TokenStream::checkpoint`] and
//!   [`TokenStream::rollback`] implement the one speculative parse.
//! - **Automatic semicolons**: [`TokenStream::insert_automatic_semicolon`]
//!   splices a zero-width terminator into the buffer at the cursor.
//!
//! Lexical errors stay attached to the entry that produced them and are
//! handed to the parser when that entry is consumed, so a rolled-back
//! speculation reports them again on the second pass.

use super::{LexError, LexGoal, ScanState, Scanner, Token, TokenKind};

#[derive(Debug, Clone)]
struct Entry {
    token: Token,
    errors: Vec<LexError>,
    state_before: ScanState,
    goal: LexGoal,
    synthetic: bool,
}

/// A saved cursor position; see [`TokenStream::rollback`].
#[derive(Debug, Clone)]
pub struct Checkpoint {
    cursor: usize,
    state: ScanState,
}

/// Buffered tokens over a [`Scanner`].
#[derive(Debug)]
pub struct TokenStream<'src> {
    scanner: Scanner<'src>,
    entries: Vec<Entry>,
    cursor: usize,
}

impl<'src> TokenStream<'src> {
    /// Creates a stream over `scanner`.
    #[must_use]
    pub fn new(scanner: Scanner<'src>) -> Self {
        Self {
            scanner,
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Scans until `index` is buffered. The buffer never grows past `Eof`.
    fn fill(&mut self, index: usize) {
        while self.entries.len() <= index {
            if self
                .entries
                .last()
                .is_some_and(|entry| entry.token.kind().is_eof())
            {
                return;
            }
            self.scan_entry(LexGoal::Code);
        }
    }

    fn scan_entry(&mut self, goal: LexGoal) {
        let state_before = self.scanner.state();
        let (token, errors) = self.scanner.next_token(goal);
        self.entries.push(Entry {
            token,
            errors,
            state_before,
            goal,
            synthetic: false,
        });
    }

    /// Index of the entry at `cursor + n`, clamped to the final `Eof`.
    fn index_at(&mut self, n: usize) -> usize {
        let index = self.cursor + n;
        self.fill(index);
        index.min(self.entries.len().saturating_sub(1))
    }

    /// Number of entries consumed so far, automatic semicolons included.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// The current token.
    pub fn current(&mut self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead of the cursor (`0` is the current one).
    /// Past the end this is the `Eof` token.
    pub fn peek_nth(&mut self, n: usize) -> &Token {
        let index = self.index_at(n);
        &self.entries[index].token
    }

    /// Kind of the token `n` positions ahead.
    pub fn kind_at(&mut self, n: usize) -> TokenKind {
        self.peek_nth(n).kind()
    }

    /// Makes sure the current token was scanned under `goal`, re-scanning it
    /// (and dropping any lookahead) if not.
    pub fn relex(&mut self, goal: LexGoal) -> &Token {
        if let Some(entry) = self.entries.get(self.cursor)
            && (entry.goal != goal && !entry.synthetic)
        {
            tracing::trace!(
                offset = entry.state_before.offset(),
                ?goal,
                "re-scanning token under new goal"
            );
            let state = entry.state_before.clone();
            self.entries.truncate(self.cursor);
            self.scanner.restore(state);
        }
        // The cursor never moves past `Eof`, so an empty slot here is always
        // scannable.
        if self.entries.len() == self.cursor {
            self.scan_entry(goal);
        }
        &self.entries[self.cursor].token
    }

    /// Consumes the current token, returning it with the lexical errors
    /// found while scanning it. At `Eof` the cursor does not move and no
    /// errors are returned; see [`TokenStream::eof_errors`].
    pub fn advance(&mut self) -> (Token, Vec<LexError>) {
        let index = self.index_at(0);
        let entry = &self.entries[index];
        if entry.token.kind().is_eof() {
            return (entry.token.clone(), Vec::new());
        }
        self.cursor = index + 1;
        (entry.token.clone(), entry.errors.clone())
    }

    /// The most recently consumed token, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(|entry| &entry.token)
    }

    /// Lexical errors attached to the final `Eof` (unterminated literals,
    /// comments running to the end of input).
    pub fn eof_errors(&mut self) -> Vec<LexError> {
        let index = self.index_at(0);
        let entry = &self.entries[index];
        if entry.token.kind().is_eof() {
            entry.errors.clone()
        } else {
            Vec::new()
        }
    }

    /// Returns true if the current token is an `Eof` produced because the
    /// scanner gave up on an unterminated literal. The parser does not add
    /// "unexpected end of input" errors on top of that lexical error.
    pub fn at_truncated_eof(&mut self) -> bool {
        let index = self.index_at(0);
        let entry = &self.entries[index];
        entry.token.kind().is_eof() && entry.errors.iter().any(LexError::is_unterminated)
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    /// Saves the cursor and the scanner state in front of it.
    pub fn checkpoint(&mut self) -> Checkpoint {
        let state = self.entries.get(self.cursor).map_or_else(
            || self.scanner.state(),
            |entry| entry.state_before.clone(),
        );
        Checkpoint {
            cursor: self.cursor,
            state,
        }
    }

    /// Returns to `checkpoint`. Everything buffered after it, including
    /// automatic semicolons and re-scanned tokens, is discarded and scanned
    /// again on demand.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        tracing::trace!(
            from = self.cursor,
            to = checkpoint.cursor,
            "rolling back token stream"
        );
        self.entries.truncate(checkpoint.cursor);
        self.scanner.restore(checkpoint.state);
        self.cursor = checkpoint.cursor;
    }

    // ========================================================================
    // Automatic semicolon insertion
    // ========================================================================

    /// Returns true if a statement may end in front of the current token
    /// without an explicit `;`.
    ///
    /// That is the case before `}` and at end of input, and before a token
    /// on a new line that cannot continue the previous statement. Tokens
    /// starting with `` ` , : ; * % > < = [ ( ? ^ | & / `` or `.` continue
    /// it, as do `+`/`-` (but not `++`/`--`), `!=`/`!==`, and the words
    /// `in` and `instanceof`.
    pub fn permits_automatic_semicolon(&mut self) -> bool {
        if self
            .previous()
            .is_some_and(|token| token.kind() == TokenKind::AutomaticSemicolon)
        {
            return false;
        }
        let token = self.current();
        match token.kind() {
            TokenKind::RightBrace | TokenKind::Eof => true,
            _ if !token.preceded_by_newline() => false,
            kind => !continues_statement(kind, token.lexeme()),
        }
    }

    /// Splices an `AutomaticSemicolon` in front of the current token and
    /// consumes it. Returns `None` (and inserts nothing) if a terminator may
    /// not be inserted here.
    pub fn insert_automatic_semicolon(&mut self) -> Option<Token> {
        if !self.permits_automatic_semicolon() {
            return None;
        }
        let at = self
            .previous()
            .map_or_else(|| self.entries[self.cursor].token.start(), Token::end);
        let token = Token::automatic_semicolon(at);
        let state_before = self.entries[self.cursor].state_before.clone();
        self.entries.insert(
            self.cursor,
            Entry {
                token: token.clone(),
                errors: Vec::new(),
                state_before,
                goal: LexGoal::Code,
                synthetic: true,
            },
        );
        self.cursor += 1;
        Some(token)
    }

    /// Finishes the stream, scanning whatever the parser did not reach, and
    /// returns every token up to and including `Eof`, with the lexical
    /// errors of tokens the parser never consumed.
    #[must_use]
    pub fn into_tokens(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut unconsumed = Vec::new();
        loop {
            let index = self.index_at(0);
            let entry = &self.entries[index];
            if entry.token.kind().is_eof() {
                break;
            }
            unconsumed.extend(entry.errors.iter().cloned());
            self.cursor = index + 1;
        }
        let tokens = self.entries.into_iter().map(|entry| entry.token).collect();
        (tokens, unconsumed)
    }
}

fn continues_statement(kind: TokenKind, lexeme: &str) -> bool {
    match kind {
        TokenKind::PlusPlus | TokenKind::MinusMinus => false,
        TokenKind::Identifier => matches!(lexeme, "in" | "instanceof"),
        // A leading-dot number such as `.5` starts a new statement.
        TokenKind::Number => false,
        _ => lexeme.chars().next().is_some_and(|c| {
            matches!(
                c,
                '`' | ','
                    | ':'
                    | ';'
                    | '*'
                    | '%'
                    | '>'
                    | '<'
                    | '='
                    | '['
                    | '('
                    | '?'
                    | '^'
                    | '|'
                    | '&'
                    | '/'
                    | '.'
                    | '+'
                    | '-'
            )
        }) || kind == TokenKind::BangEqual
            || kind == TokenKind::BangEqualEqual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Dialect;

    fn stream(source: &str, dialect: Dialect) -> TokenStream<'_> {
        TokenStream::new(Scanner::new(source, dialect))
    }

    #[test]
    fn peek_does_not_consume() {
        let mut s = stream("a b c", Dialect::Actor);
        assert_eq!(s.peek_nth(2).lexeme(), "c");
        assert_eq!(s.current().lexeme(), "a");
        assert_eq!(s.advance().0.lexeme(), "a");
        assert_eq!(s.current().lexeme(), "b");
    }

    #[test]
    fn peek_past_end_is_eof() {
        let mut s = stream("a", Dialect::Actor);
        assert_eq!(s.kind_at(5), TokenKind::Eof);
        s.advance();
        assert_eq!(s.advance().0.kind(), TokenKind::Eof);
        assert_eq!(s.current().kind(), TokenKind::Eof);
    }

    #[test]
    fn relex_splits_greater_greater() {
        let mut s = stream("a>>b", Dialect::Full);
        s.advance();
        assert_eq!(s.kind_at(0), TokenKind::GreaterGreater);
        assert_eq!(s.relex(LexGoal::TypeArguments).kind(), TokenKind::Greater);
        s.advance();
        assert_eq!(s.relex(LexGoal::TypeArguments).kind(), TokenKind::Greater);
        s.advance();
        assert_eq!(s.current().lexeme(), "b");
    }

    #[test]
    fn relex_reads_fjx_text() {
        let mut s = stream("<p>hi there</p>", Dialect::Actor);
        s.advance();
        s.advance();
        s.relex(LexGoal::FjxTag);
        s.advance();
        let text = s.relex(LexGoal::FjxText).clone();
        assert_eq!(text.kind(), TokenKind::FjxText);
        assert_eq!(text.lexeme(), "hi there");
        s.advance();
        assert_eq!(s.relex(LexGoal::FjxText).kind(), TokenKind::LessSlash);
    }

    #[test]
    fn rollback_restores_cursor_and_rescans() {
        let mut s = stream("(a, b) => a", Dialect::Full);
        let checkpoint = s.checkpoint();
        for _ in 0..4 {
            s.advance();
        }
        assert_eq!(s.current().kind(), TokenKind::RightParen);
        s.rollback(checkpoint);
        assert_eq!(s.current().kind(), TokenKind::LeftParen);
        assert_eq!(s.kind_at(5), TokenKind::Arrow);
    }

    #[test]
    fn rollback_removes_automatic_semicolons() {
        let mut s = stream("a\nb", Dialect::Actor);
        let checkpoint = s.checkpoint();
        s.advance();
        assert!(s.insert_automatic_semicolon().is_some());
        s.rollback(checkpoint);
        s.advance();
        assert_eq!(s.current().lexeme(), "b");
    }

    #[test]
    fn automatic_semicolon_needs_newline() {
        let mut s = stream("a b", Dialect::Actor);
        s.advance();
        assert!(s.insert_automatic_semicolon().is_none());
    }

    #[test]
    fn automatic_semicolon_before_brace_and_eof() {
        let mut s = stream("a }", Dialect::Actor);
        s.advance();
        assert!(s.permits_automatic_semicolon());
        let mut s = stream("a", Dialect::Actor);
        s.advance();
        let semicolon = s.insert_automatic_semicolon();
        assert_eq!(semicolon.map(|t| t.span()), Some(crate::source_analysis::Span::new(1, 1)));
    }

    #[test]
    fn continuation_characters_block_automatic_semicolon() {
        for source in ["a\n(b)", "a\n[b]", "a\n.b", "a\n+b", "a\n!= b", "a\n in b"] {
            let mut s = stream(source, Dialect::Full);
            s.advance();
            assert!(!s.permits_automatic_semicolon(), "{source:?}");
        }
        for source in ["a\n++b", "a\n!b", "a\n.5", "a\nb"] {
            let mut s = stream(source, Dialect::Full);
            s.advance();
            assert!(s.permits_automatic_semicolon(), "{source:?}");
        }
    }

    #[test]
    fn never_two_automatic_semicolons_in_a_row() {
        let mut s = stream("a\n}", Dialect::Actor);
        s.advance();
        assert!(s.insert_automatic_semicolon().is_some());
        assert!(s.insert_automatic_semicolon().is_none());
    }

    #[test]
    fn lex_errors_are_returned_on_consume_and_rollback() {
        let mut s = stream("a \\x b", Dialect::Actor);
        let checkpoint = s.checkpoint();
        s.advance();
        assert_eq!(s.advance().1.len(), 1);
        s.rollback(checkpoint);
        s.advance();
        assert_eq!(s.advance().1.len(), 1);
    }

    #[test]
    fn truncated_eof_is_flagged() {
        let mut s = stream("let x = \"abc", Dialect::Actor);
        for _ in 0..3 {
            s.advance();
        }
        assert!(s.at_truncated_eof());
        assert_eq!(s.eof_errors().len(), 1);
        let mut s = stream("x", Dialect::Actor);
        s.advance();
        assert!(!s.at_truncated_eof());
    }

    #[test]
    fn into_tokens_includes_unreached_input() {
        let mut s = stream("a b c", Dialect::Actor);
        s.advance();
        let (tokens, errors) = s.into_tokens();
        assert_eq!(tokens.len(), 4);
        assert!(errors.is_empty());
    }
}
