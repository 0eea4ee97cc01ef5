// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Fujin lexical analysis.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the type of token
//! - The exact source text it covers (its lexeme)
//! - A [`Span`] plus resolved start/end [`Position`]s
//! - Leading [`Trivia`] (whitespace, comments, skipped text)
//!
//! Concatenating every token's leading trivia and lexeme, in order,
//! reproduces the source exactly. The [`TokenKind::Eof`] token owns the
//! trivia at the end of the file.
//!
//! String and template literals are split into pieces (start, fragments,
//! escape sequences, end) so escapes keep their own spans.

use std::fmt;

use ecow::EcoString;

use super::{Dialect, Position, SourceBuffer, Span};

/// Reserved words.
///
/// Which of these are reserved depends on the [`Dialect`]; see
/// [`Keyword::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Action,
    Actor,
    As,
    Assert,
    Async,
    Await,
    Break,
    Case,
    Catch,
    Const,
    Continue,
    Default,
    Else,
    Emit,
    Export,
    Extends,
    False,
    Finally,
    For,
    From,
    Function,
    If,
    Import,
    Interface,
    Let,
    Null,
    Return,
    Switch,
    Throw,
    True,
    Try,
    Type,
}

impl Keyword {
    const ALL: [Self; 32] = [
        Self::Action,
        Self::Actor,
        Self::As,
        Self::Assert,
        Self::Async,
        Self::Await,
        Self::Break,
        Self::Case,
        Self::Catch,
        Self::Const,
        Self::Continue,
        Self::Default,
        Self::Else,
        Self::Emit,
        Self::Export,
        Self::Extends,
        Self::False,
        Self::Finally,
        Self::For,
        Self::From,
        Self::Function,
        Self::If,
        Self::Import,
        Self::Interface,
        Self::Let,
        Self::Null,
        Self::Return,
        Self::Switch,
        Self::Throw,
        Self::True,
        Self::Try,
        Self::Type,
    ];

    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Actor => "actor",
            Self::As => "as",
            Self::Assert => "assert",
            Self::Async => "async",
            Self::Await => "await",
            Self::Break => "break",
            Self::Case => "case",
            Self::Catch => "catch",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Else => "else",
            Self::Emit => "emit",
            Self::Export => "export",
            Self::Extends => "extends",
            Self::False => "false",
            Self::Finally => "finally",
            Self::For => "for",
            Self::From => "from",
            Self::Function => "function",
            Self::If => "if",
            Self::Import => "import",
            Self::Interface => "interface",
            Self::Let => "let",
            Self::Null => "null",
            Self::Return => "return",
            Self::Switch => "switch",
            Self::Throw => "throw",
            Self::True => "true",
            Self::Try => "try",
            Self::Type => "type",
        }
    }

    /// Returns true if the word is reserved in `dialect`.
    #[must_use]
    pub const fn is_reserved_in(self, dialect: Dialect) -> bool {
        match self {
            Self::Action | Self::Actor | Self::Assert | Self::Emit => {
                matches!(dialect, Dialect::Actor)
            }
            Self::Async
            | Self::Await
            | Self::Extends
            | Self::Function
            | Self::Interface
            | Self::Return => matches!(dialect, Dialect::Full),
            _ => true,
        }
    }

    /// Looks up `word` as a reserved word of `dialect`.
    ///
    /// ```
    /// use fujin_syntax::source_analysis::{Dialect, Keyword};
    ///
    /// assert_eq!(Keyword::lookup("emit", Dialect::Actor), Some(Keyword::Emit));
    /// assert_eq!(Keyword::lookup("emit", Dialect::Full), None);
    /// assert_eq!(Keyword::lookup("return", Dialect::Full), Some(Keyword::Return));
    /// ```
    #[must_use]
    pub fn lookup(word: &str, dialect: Dialect) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|keyword| keyword.as_str() == word && keyword.is_reserved_in(dialect))
    }

    /// Keywords that begin a statement or declaration; used as recovery
    /// points after a syntax error.
    #[must_use]
    pub const fn starts_statement(self) -> bool {
        matches!(
            self,
            Self::Actor
                | Self::Assert
                | Self::Async
                | Self::Break
                | Self::Const
                | Self::Continue
                | Self::Emit
                | Self::Export
                | Self::For
                | Self::Function
                | Self::If
                | Self::Import
                | Self::Interface
                | Self::Let
                | Self::Return
                | Self::Switch
                | Self::Throw
                | Self::Try
                | Self::Type
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token, not including source location or trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Names and literals ===
    /// An identifier: `count`, `$el`, `ab`
    Identifier,
    /// An action reference: `@click`
    ActionIdentifier,
    /// A reserved word of the active dialect.
    Keyword(Keyword),
    /// A numeric literal: `42`, `0xff`, `1_000`, `.5e-3`
    Number,
    /// Opening quote of a string literal.
    StringStart,
    /// A run of unescaped characters inside a string or template.
    StringFragment,
    /// A backslash escape inside a string or template: `\n`, `\x41`, `\u{1F600}`
    EscapeSequence,
    /// Closing quote of a string literal.
    StringEnd,
    /// Opening backtick of a template literal.
    TemplateStart,
    /// Raw characters inside a template literal.
    TemplateChars,
    /// `${` opening a template substitution.
    TemplateSubstitutionStart,
    /// `}` closing a template substitution.
    TemplateSubstitutionEnd,
    /// Closing backtick of a template literal.
    TemplateEnd,
    /// A regex body including its slashes: `/ab+c/`
    RegexPattern,
    /// Flags immediately following a regex: `gi`
    RegexFlags,
    /// Raw text between FJX tags.
    FjxText,
    /// `#!` line at the very start of the file.
    HashBang,

    // === Delimiters ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,

    // === Punctuation ===
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,
    /// `?` (conditional, or optional marker in types)
    Question,
    /// `?.`
    QuestionDot,
    /// `??`
    QuestionQuestion,
    /// `@` on its own (the meta property)
    At,
    /// `=>`
    Arrow,

    // === Operators ===
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `^`
    Caret,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `<<`
    LessLess,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `>>`
    GreaterGreater,
    /// `>>>`
    GreaterGreaterGreater,
    /// `=`
    Equal,
    /// `==`
    EqualEqual,
    /// `===`
    EqualEqualEqual,
    /// `!=`
    BangEqual,
    /// `!==`
    BangEqualEqual,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `/=`
    SlashEqual,
    /// `%=`
    PercentEqual,
    /// `**=`
    StarStarEqual,
    /// `<<=`
    LessLessEqual,
    /// `>>=`
    GreaterGreaterEqual,
    /// `>>>=`
    GreaterGreaterGreaterEqual,
    /// `&=`
    AmpEqual,
    /// `^=`
    CaretEqual,
    /// `|=`
    PipeEqual,
    /// `&&=`
    AmpAmpEqual,
    /// `||=`
    PipePipeEqual,
    /// `??=`
    QuestionQuestionEqual,
    /// `</` opening an FJX closing tag
    LessSlash,
    /// `/>` ending a self-closing FJX tag
    SlashGreater,

    // === Special ===
    /// A statement terminator synthesised by automatic semicolon insertion.
    /// Always zero-width.
    AutomaticSemicolon,
    /// End of file.
    Eof,
    /// Text the scanner could not classify; a lexical diagnostic accompanies it.
    Error,
}

impl TokenKind {
    /// Returns `true` for `Identifier` tokens.
    #[must_use]
    pub const fn is_identifier(self) -> bool {
        matches!(self, Self::Identifier)
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` for either statement terminator.
    #[must_use]
    pub const fn is_semicolon(self) -> bool {
        matches!(self, Self::Semicolon | Self::AutomaticSemicolon)
    }

    /// Returns `true` for assignment operators (`=` and the compound forms).
    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::PlusEqual
                | Self::MinusEqual
                | Self::StarEqual
                | Self::SlashEqual
                | Self::PercentEqual
                | Self::StarStarEqual
                | Self::LessLessEqual
                | Self::GreaterGreaterEqual
                | Self::GreaterGreaterGreaterEqual
                | Self::AmpEqual
                | Self::CaretEqual
                | Self::PipeEqual
                | Self::AmpAmpEqual
                | Self::PipePipeEqual
                | Self::QuestionQuestionEqual
        )
    }

    /// Returns `true` if a `/` after this token is division rather than
    /// the start of a regex literal.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::ActionIdentifier
                | Self::Number
                | Self::StringEnd
                | Self::TemplateEnd
                | Self::RightParen
                | Self::RightBracket
                | Self::PlusPlus
                | Self::MinusMinus
                | Self::RegexPattern
                | Self::RegexFlags
                | Self::Keyword(Keyword::True | Keyword::False | Keyword::Null)
        )
    }

    /// Short human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(self) -> EcoString {
        match self {
            Self::Identifier => "identifier".into(),
            Self::ActionIdentifier => "action identifier".into(),
            Self::Keyword(keyword) => ecow::eco_format!("keyword `{keyword}`"),
            Self::Number => "number".into(),
            Self::StringStart
            | Self::StringFragment
            | Self::EscapeSequence
            | Self::StringEnd => "string".into(),
            Self::TemplateStart
            | Self::TemplateChars
            | Self::TemplateSubstitutionStart
            | Self::TemplateSubstitutionEnd
            | Self::TemplateEnd => "template string".into(),
            Self::RegexPattern | Self::RegexFlags => "regular expression".into(),
            Self::FjxText => "markup text".into(),
            Self::HashBang => "hashbang line".into(),
            Self::AutomaticSemicolon => "end of statement".into(),
            Self::Eof => "end of input".into(),
            Self::Error => "invalid token".into(),
            punct => ecow::eco_format!("`{}`", punct.punctuator_text().unwrap_or("?")),
        }
    }

    /// The fixed spelling of punctuators and operators.
    #[must_use]
    pub const fn punctuator_text(self) -> Option<&'static str> {
        Some(match self {
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Question => "?",
            Self::QuestionDot => "?.",
            Self::QuestionQuestion => "??",
            Self::At => "@",
            Self::Arrow => "=>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::Amp => "&",
            Self::AmpAmp => "&&",
            Self::Pipe => "|",
            Self::PipePipe => "||",
            Self::Caret => "^",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::LessLess => "<<",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::GreaterGreater => ">>",
            Self::GreaterGreaterGreater => ">>>",
            Self::Equal => "=",
            Self::EqualEqual => "==",
            Self::EqualEqualEqual => "===",
            Self::BangEqual => "!=",
            Self::BangEqualEqual => "!==",
            Self::PlusEqual => "+=",
            Self::MinusEqual => "-=",
            Self::StarEqual => "*=",
            Self::SlashEqual => "/=",
            Self::PercentEqual => "%=",
            Self::StarStarEqual => "**=",
            Self::LessLessEqual => "<<=",
            Self::GreaterGreaterEqual => ">>=",
            Self::GreaterGreaterGreaterEqual => ">>>=",
            Self::AmpEqual => "&=",
            Self::CaretEqual => "^=",
            Self::PipeEqual => "|=",
            Self::AmpAmpEqual => "&&=",
            Self::PipePipeEqual => "||=",
            Self::QuestionQuestionEqual => "??=",
            Self::LessSlash => "</",
            Self::SlashGreater => "/>",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Non-semantic source text attached to a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Spaces, tabs, line terminators and invisible spacing characters.
    Whitespace(EcoString),
    /// A line comment, without its terminating newline: `// note`
    LineComment(EcoString),
    /// A block comment: `/* note */`
    BlockComment(EcoString),
    /// Input the scanner gave up on after an unterminated literal.
    Skipped(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s) | Self::LineComment(s) | Self::BlockComment(s) | Self::Skipped(s) => {
                s.as_str()
            }
        }
    }

    /// Returns true if this trivia contains a line terminator.
    #[must_use]
    pub fn contains_newline(&self) -> bool {
        self.as_str().chars().any(super::is_line_terminator)
    }

    /// Returns true for comments of either form.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }
}

/// A token with its kind, text, location and leading trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: EcoString,
    span: Span,
    start: Position,
    end: Position,
    leading_trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<EcoString>,
        span: Span,
        (start, end): (Position, Position),
        leading_trivia: Vec<Trivia>,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            start,
            end,
            leading_trivia,
        }
    }

    /// Creates the zero-width terminator produced by automatic semicolon
    /// insertion.
    #[must_use]
    pub fn automatic_semicolon(at: Position) -> Self {
        Self {
            kind: TokenKind::AutomaticSemicolon,
            lexeme: EcoString::new(),
            span: Span::empty_at(at.offset),
            start: at,
            end: at,
            leading_trivia: Vec::new(),
        }
    }

    /// Returns the token kind.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the exact source text of this token.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The slice of `source` this token covers. Equal to
    /// [`Token::lexeme`] when `source` is the buffer that was scanned.
    #[must_use]
    pub fn text<'s>(&self, source: &'s SourceBuffer) -> &'s str {
        source.slice(self.span)
    }

    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Resolved start position.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Resolved end position.
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Returns the leading trivia.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    /// Returns true if a line terminator appears in the leading trivia,
    /// including inside a block comment.
    #[must_use]
    pub fn preceded_by_newline(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::contains_newline)
    }

    /// Returns true if any leading trivia is skipped text.
    #[must_use]
    pub fn has_skipped_text(&self) -> bool {
        self.leading_trivia
            .iter()
            .any(|t| matches!(t, Trivia::Skipped(_)))
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Returns true for an identifier spelled exactly `word`.
    ///
    /// Used for contextual words such as `of` or predefined type names.
    #[must_use]
    pub fn is_contextual(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for trivia in &self.leading_trivia {
            f.write_str(trivia.as_str())?;
        }
        f.write_str(&self.lexeme)
    }
}
