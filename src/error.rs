//! Error types and position tracking for .env lexing
//!
//! The lexer reports malformed input as tokens rather than errors. This module
//! holds the types used when a caller wants to turn those tokens into
//! positioned diagnostics, plus the few conditions that really are errors
//! (oversized input, I/O failures).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number, counted from the lexer's configured first line
    pub line: u32,
    /// Byte column on the line (1-based)
    pub column: u32,
    /// Byte offset from start of input (0-based)
    pub offset: u32,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Resolves a byte offset into a position, given the line it sits on.
    ///
    /// The column is measured from the nearest preceding CR or LF byte.
    pub fn resolve(input: &[u8], offset: u32, line: u32) -> Self {
        let upto = (offset as usize).min(input.len());
        let line_start = input[..upto]
            .iter()
            .rposition(|&b| b == b'\n' || b == b'\r')
            .map_or(0, |idx| idx + 1);
        Self {
            line,
            column: (upto - line_start) as u32 + 1,
            offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a span of text in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start position of the span
    pub start: Position,
    /// End position of the span (exclusive)
    pub end: Position,
}

impl Span {
    /// Creates a new span from start and end positions
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a span covering a single position
    pub fn single(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns the length of the span in bytes
    pub fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the span is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this span contains the given position
    pub fn contains(&self, position: Position) -> bool {
        position.offset >= self.start.offset && position.offset < self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Main error type for .env lexing operations
#[derive(Debug, Error)]
pub enum DotenvError {
    /// Lexical analysis error
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// I/O error while loading input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lexical errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// Input cannot be addressed by 32-bit token offsets
    #[error("Input of {length} bytes exceeds the 4294967295 byte limit")]
    InputTooLarge { length: usize },

    /// Control byte outside of a quoted value
    #[error("Invalid character 0x{byte:02x} at {position}")]
    InvalidCharacter { byte: u8, position: Position },

    /// Single-quoted value ran to end of input
    #[error("Unterminated single-quoted value starting at {position}")]
    UnterminatedValue { position: Position },

    /// Double-quoted value ran to end of input
    #[error("Unterminated double-quoted value starting at {position}")]
    UnterminatedDoubleQuotedValue { position: Position },
}

impl LexError {
    /// Returns the source position of the error, if it has one
    pub fn position(&self) -> Option<Position> {
        match self {
            LexError::InputTooLarge { .. } => None,
            LexError::InvalidCharacter { position, .. }
            | LexError::UnterminatedValue { position }
            | LexError::UnterminatedDoubleQuotedValue { position } => Some(*position),
        }
    }
}

/// Context information for rendering an error against its source
#[derive(Debug, Clone)]
pub struct ErrorContext<'a> {
    /// Source bytes the span refers to
    pub source: &'a [u8],
    /// The span where the error occurred
    pub span: Span,
    /// Additional help text
    pub help: Option<String>,
}

impl<'a> ErrorContext<'a> {
    /// Creates a new error context
    pub fn new(source: &'a [u8], span: Span) -> Self {
        Self {
            source,
            span,
            help: None,
        }
    }

    /// Adds help text for the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Byte range of the line the span starts on, without its terminator
    fn line_bounds(&self) -> (usize, usize) {
        let start = (self.span.start.offset as usize).min(self.source.len());
        let line_start = self.source[..start]
            .iter()
            .rposition(|&b| b == b'\n' || b == b'\r')
            .map_or(0, |idx| idx + 1);
        let line_end = self.source[start..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
            .map_or(self.source.len(), |idx| start + idx);
        (line_start, line_end)
    }

    /// Returns the text of the line the span starts on, without its terminator
    pub fn line_text(&self) -> String {
        let (line_start, line_end) = self.line_bounds();
        String::from_utf8_lossy(&self.source[line_start..line_end]).into_owned()
    }

    /// Extracts the offending line with a caret marker under the span.
    ///
    /// The caret is placed by character of the rendered line, so multi-byte
    /// UTF-8 and replaced invalid bytes each take one column.
    pub fn source_snippet(&self) -> String {
        let (line_start, line_end) = self.line_bounds();
        let start = (self.span.start.offset as usize).clamp(line_start, line_end);
        let gutter = self.span.start.line.to_string();

        // Multi-line spans are marked up to the end of their first line.
        let marked_end = if self.span.start.line == self.span.end.line {
            (self.span.end.offset as usize).clamp(start, line_end)
        } else {
            line_end
        };
        let column = rendered_width(&self.source[line_start..start]);
        let width = rendered_width(&self.source[start..marked_end]).max(1);

        let mut out = format!("{} | {}\n", gutter, self.line_text());
        out.push_str(&" ".repeat(gutter.len() + 3 + column));
        out.push_str(&"^".repeat(width));
        out.push('\n');
        out
    }

    /// Formats the error context for display
    pub fn format_error(&self, error_message: &str) -> String {
        let mut output = format!("Error at {}: {}\n\n", self.span.start, error_message);
        output.push_str(&self.source_snippet());
        if let Some(help) = &self.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }
        output
    }
}

/// Number of characters `bytes` occupies once rendered with lossy UTF-8
fn rendered_width(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes).chars().count()
}
