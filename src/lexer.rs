//! .env lexical analyzer
//!
//! This module provides the tokenizer state machine: a cursor over an
//! immutable byte buffer that classifies every byte range of the input into
//! exactly one [`Token`]. Malformed input is reported through token kinds,
//! never through `Err` or panics, so a caller can always keep scanning.

use crate::error::{LexError, Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// Bitfield flags for byte classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterFlags(u8);

impl CharacterFlags {
    /// Blank characters (space, tab)
    pub const BLANK: Self = Self(1 << 0);
    /// Line terminators (newline, carriage return)
    pub const LINE_TERMINATOR: Self = Self(1 << 1);
    /// Bytes that end a bare value
    pub const VALUE_END: Self = Self(1 << 2);
    /// Control bytes not allowed outside quotes
    pub const INVALID: Self = Self(1 << 3);

    /// Creates empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Checks if any of the given flags are set
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns the union of two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no flags are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for CharacterFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Byte lookup table for O(1) classification
#[derive(Debug, Clone)]
pub struct CharacterTable([CharacterFlags; 256]);

impl CharacterTable {
    /// Creates a new table with compile-time initialization
    pub const fn new() -> Self {
        let mut table = [CharacterFlags::empty(); 256];
        let mut i = 0;

        while i < 256 {
            let ch = i as u8;
            let mut flags = CharacterFlags::empty();

            match ch {
                b' ' | b'\t' => {
                    flags = flags
                        .union(CharacterFlags::BLANK)
                        .union(CharacterFlags::VALUE_END)
                }
                b'\n' | b'\r' => {
                    flags = flags
                        .union(CharacterFlags::LINE_TERMINATOR)
                        .union(CharacterFlags::VALUE_END)
                }
                b'#' | b'=' | b'\'' | b'"' => flags = flags.union(CharacterFlags::VALUE_END),
                0x00..=0x1F | 0x7F => {
                    flags = flags
                        .union(CharacterFlags::INVALID)
                        .union(CharacterFlags::VALUE_END)
                }
                _ => {}
            }

            table[i] = flags;
            i += 1;
        }

        Self(table)
    }

    #[inline(always)]
    pub const fn test_character(&self, ch: u8, flags: CharacterFlags) -> bool {
        self.0[ch as usize].intersects(flags)
    }

    /// Space, tab, CR or LF
    #[inline(always)]
    pub const fn is_whitespace(&self, ch: u8) -> bool {
        self.test_character(
            ch,
            CharacterFlags::BLANK.union(CharacterFlags::LINE_TERMINATOR),
        )
    }

    #[inline(always)]
    pub const fn is_line_terminator(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::LINE_TERMINATOR)
    }

    #[inline(always)]
    pub const fn is_value_end(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::VALUE_END)
    }

    #[inline(always)]
    pub const fn is_invalid(&self, ch: u8) -> bool {
        self.test_character(ch, CharacterFlags::INVALID)
    }
}

impl Default for CharacterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Global character table instance
pub static CHARACTER_TABLE: CharacterTable = CharacterTable::new();

/// Configuration options for the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Number assigned to the first line of input; later lines saturate at `u32::MAX`
    pub first_line: u32,
    /// Count CR LF as one line terminator instead of two
    pub crlf_as_single_terminator: bool,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            first_line: 1,
            crlf_as_single_terminator: true,
        }
    }
}

/// Classification of a token.
///
/// The discriminants are part of the C interface and must not be reordered.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Control byte outside of quotes
    Error_InvalidCharacter = 0,
    /// Bare, unquoted value
    Value = 1,
    /// Single-quoted value missing its closing quote
    UnterminatedValue = 2,
    /// Double-quoted value missing its closing quote
    UnterminatedDoubleQuotedValue = 3,
    /// Single-quoted value, both quotes included
    SingleQuotedValue = 4,
    /// Double-quoted value, both quotes included
    DoubleQuotedValue = 5,
    /// End of input
    EOF = 6,
    /// Run of spaces, tabs and line terminators
    WhiteSpace = 7,
    /// The `=` operator
    Assign = 8,
    /// `#` through end of line, terminator excluded
    Comment = 9,
}

impl TokenKind {
    /// Returns a string representation of the token kind for messages
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Error_InvalidCharacter => "invalid character",
            TokenKind::Value => "value",
            TokenKind::UnterminatedValue => "unterminated single-quoted value",
            TokenKind::UnterminatedDoubleQuotedValue => "unterminated double-quoted value",
            TokenKind::SingleQuotedValue => "single-quoted value",
            TokenKind::DoubleQuotedValue => "double-quoted value",
            TokenKind::EOF => "end of input",
            TokenKind::WhiteSpace => "whitespace",
            TokenKind::Assign => "'='",
            TokenKind::Comment => "comment",
        }
    }

    /// Numeric value used across the C boundary
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// True for kinds that signal malformed input
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TokenKind::Error_InvalidCharacter
                | TokenKind::UnterminatedValue
                | TokenKind::UnterminatedDoubleQuotedValue
        )
    }

    /// True for quoted values, terminated or not
    pub fn is_quoted(&self) -> bool {
        matches!(
            self,
            TokenKind::SingleQuotedValue
                | TokenKind::DoubleQuotedValue
                | TokenKind::UnterminatedValue
                | TokenKind::UnterminatedDoubleQuotedValue
        )
    }

    /// True for whitespace and comments
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::WhiteSpace | TokenKind::Comment)
    }
}

impl TryFrom<u32> for TokenKind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TokenKind::Error_InvalidCharacter,
            1 => TokenKind::Value,
            2 => TokenKind::UnterminatedValue,
            3 => TokenKind::UnterminatedDoubleQuotedValue,
            4 => TokenKind::SingleQuotedValue,
            5 => TokenKind::DoubleQuotedValue,
            6 => TokenKind::EOF,
            7 => TokenKind::WhiteSpace,
            8 => TokenKind::Assign,
            9 => TokenKind::Comment,
            other => return Err(other),
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, positioned span of the input.
///
/// Tokens hold offsets only; use [`Token::text`] or [`Lexer::token_text`] to
/// get at the bytes. Field order matches the C `DotenvLexer_Token` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Offset of the first byte
    pub start: u32,
    /// Offset one past the last byte
    pub end: u32,
    /// Line the token begins on
    pub line: u32,
    /// Offset of the last byte consumed; equals `start` for EOF
    pub last_char_pos: u32,
    pub kind: TokenKind,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: u32, end: u32, line: u32) -> Self {
        Self {
            start,
            end,
            line,
            last_char_pos: if end > start { end - 1 } else { start },
            kind,
        }
    }

    /// Returns the length of the token in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// Returns true for zero-length tokens
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Returns the token's bytes within `input`
    pub fn text<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    /// Returns the byte range covered by the token
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Minimal snapshot of lexer state for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerSnapshot {
    position: u32,
    line: u32,
}

/// .env lexer over a borrowed byte buffer
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// Input bytes being lexed
    input: &'a [u8],
    /// Current byte position in input
    position: u32,
    /// Current line number
    line: u32,
    config: LexerConfig,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer with default configuration
    pub fn new(input: &'a [u8]) -> Result<Self, LexError> {
        Self::with_config(input, LexerConfig::default())
    }

    /// Creates a new lexer over UTF-8 text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Result<Self, LexError> {
        Self::new(input.as_bytes())
    }

    /// Creates a new lexer with custom configuration
    pub fn with_config(input: &'a [u8], config: LexerConfig) -> Result<Self, LexError> {
        if u32::try_from(input.len()).is_err() {
            return Err(LexError::InputTooLarge {
                length: input.len(),
            });
        }
        tracing::debug!(len = input.len(), ?config, "created dotenv lexer");
        Ok(Self {
            input,
            position: 0,
            line: config.first_line,
            config,
        })
    }

    /// A lexer over no input, which only ever yields `EOF`
    pub(crate) fn empty() -> Lexer<'static> {
        let config = LexerConfig::default();
        Lexer {
            input: &[],
            position: 0,
            line: config.first_line,
            config,
        }
    }

    /// Returns the current byte offset
    #[inline(always)]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns the current line number
    #[inline(always)]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns true once all input has been consumed
    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.position as usize == self.input.len()
    }

    /// Returns the underlying input
    #[inline(always)]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Returns the bytes covered by `token`
    pub fn token_text(&self, token: &Token) -> &'a [u8] {
        token.text(self.input)
    }

    /// Creates a snapshot of the current lexer state for backtracking
    pub fn snapshot(&self) -> LexerSnapshot {
        LexerSnapshot {
            position: self.position,
            line: self.line,
        }
    }

    /// Restores the lexer state from a snapshot, rewinding the position.
    ///
    /// A snapshot taken over a longer input is clamped to the end of this one.
    pub fn restore(&mut self, snapshot: LexerSnapshot) {
        self.position = snapshot.position.min(self.input.len() as u32);
        self.line = snapshot.line;
    }

    /// Returns the next token without consuming it
    pub fn peek_token(&mut self) -> Token {
        let snapshot = self.snapshot();
        let token = self.next_token();
        self.restore(snapshot);
        token
    }

    /// Returns the span of `token` with resolved line and column positions
    pub fn span_of(&self, token: &Token) -> Span {
        let start = Position::resolve(self.input, token.start, token.line);
        let end_line = token
            .line
            .saturating_add(self.count_lines(token.start as usize, token.end as usize));
        let end = Position::resolve(self.input, token.end, end_line);
        Span::new(start, end)
    }

    /// Converts an error token into a positioned [`LexError`].
    ///
    /// Returns `None` for tokens that do not represent malformed input.
    pub fn diagnose(&self, token: &Token) -> Option<LexError> {
        let position = Position::resolve(self.input, token.start, token.line);
        match token.kind {
            TokenKind::Error_InvalidCharacter => self
                .input
                .get(token.start as usize)
                .map(|&byte| LexError::InvalidCharacter { byte, position }),
            TokenKind::UnterminatedValue => Some(LexError::UnterminatedValue { position }),
            TokenKind::UnterminatedDoubleQuotedValue => {
                Some(LexError::UnterminatedDoubleQuotedValue { position })
            }
            _ => None,
        }
    }

    #[inline(always)]
    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.position as usize).copied()
    }

    #[inline(always)]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.position as usize + offset).copied()
    }

    /// Advances one byte, counting it if it ends a line
    #[inline(always)]
    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        if self.terminates_line(self.position as usize) {
            self.line = self.line.saturating_add(1);
        }
        self.position += 1;
        Some(byte)
    }

    /// Whether the byte at `idx` completes a line terminator.
    ///
    /// With CRLF folding, a CR directly followed by LF is not counted; the LF
    /// is. This only looks at the input, so every branch agrees on the count.
    #[inline(always)]
    fn terminates_line(&self, idx: usize) -> bool {
        match self.input.get(idx) {
            Some(b'\n') => true,
            Some(b'\r') => {
                !self.config.crlf_as_single_terminator || self.input.get(idx + 1) != Some(&b'\n')
            }
            _ => false,
        }
    }

    fn count_lines(&self, start: usize, end: usize) -> u32 {
        let end = end.min(self.input.len());
        (start..end).filter(|&idx| self.terminates_line(idx)).count() as u32
    }

    fn eat_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while let Some(byte) = self.peek_byte() {
            if !predicate(byte) {
                break;
            }
            self.bump();
        }
    }

    /// Returns the next token from the input.
    ///
    /// Once the input is exhausted every call returns the same `EOF` token.
    pub fn next_token(&mut self) -> Token {
        let start = self.position;
        let line = self.line;

        let Some(lead) = self.bump() else {
            return Token::new(TokenKind::EOF, start, start, line);
        };

        let kind = match lead {
            b'#' => {
                self.eat_while(|b| !CHARACTER_TABLE.is_line_terminator(b));
                TokenKind::Comment
            }
            b'=' => TokenKind::Assign,
            b'\'' => self.single_quoted(),
            b'"' => self.double_quoted(),
            b if CHARACTER_TABLE.is_whitespace(b) => {
                self.eat_while(|b| CHARACTER_TABLE.is_whitespace(b));
                TokenKind::WhiteSpace
            }
            b if CHARACTER_TABLE.is_invalid(b) => TokenKind::Error_InvalidCharacter,
            _ => {
                self.eat_while(|b| !CHARACTER_TABLE.is_value_end(b));
                TokenKind::Value
            }
        };

        let token = Token::new(kind, start, self.position, line);
        if kind.is_error() {
            tracing::trace!(
                kind = %kind,
                start = token.start,
                end = token.end,
                line = token.line,
                "malformed input"
            );
        }
        token
    }

    /// Scans past the closing `'`, which is the first one found
    fn single_quoted(&mut self) -> TokenKind {
        while let Some(byte) = self.bump() {
            if byte == b'\'' {
                return TokenKind::SingleQuotedValue;
            }
        }
        TokenKind::UnterminatedValue
    }

    /// Scans past the first closing `"` not preceded by a backslash escape
    fn double_quoted(&mut self) -> TokenKind {
        while let Some(byte) = self.bump() {
            match byte {
                b'"' => return TokenKind::DoubleQuotedValue,
                b'\\' => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                _ => {}
            }
        }
        TokenKind::UnterminatedDoubleQuotedValue
    }

    /// Whether the bare value starting here would be followed by `=`.
    ///
    /// Useful for callers distinguishing keys from values without a parser.
    pub fn at_key(&self) -> bool {
        let mut offset = 0;
        while let Some(byte) = self.peek_byte_at(offset) {
            if CHARACTER_TABLE.is_value_end(byte) {
                return offset > 0 && byte == b'=';
            }
            offset += 1;
        }
        false
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token before `EOF`, then `None`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::EOF).then_some(token)
    }
}

impl FusedIterator for Lexer<'_> {}
