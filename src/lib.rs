//! # Dotenv Lexer
//!
//! A small, allocation-free lexer for `.env` configuration files.
//!
//! ## Overview
//!
//! The lexer turns a byte buffer into a stream of [`Token`]s that together
//! cover every byte of the input exactly once: bare values, `=`, single- and
//! double-quoted values, `#` comments and whitespace, followed by a terminal
//! `EOF`. Malformed input never aborts the scan; it is reported as one of the
//! error token kinds and the lexer moves on.
//!
//! Interpreting the tokens (key/value structure, duplicate keys, escape
//! decoding) is left to whatever sits on top.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dotenv_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::from_str("PORT=8080 # http")?;
//! let kinds: Vec<TokenKind> = lexer.by_ref().map(|token| token.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Value,
//!         TokenKind::Assign,
//!         TokenKind::Value,
//!         TokenKind::WhiteSpace,
//!         TokenKind::Comment,
//!     ]
//! );
//! assert_eq!(lexer.next_token().kind, TokenKind::EOF);
//! # Ok::<(), dotenv_lexer::LexError>(())
//! ```
//!
//! ## Token Text
//!
//! Tokens carry byte offsets, never copies of the input:
//!
//! ```rust
//! use dotenv_lexer::{Lexer, TokenKind};
//!
//! let input = br#"GREETING="hello \"world\"""#;
//! let mut lexer = Lexer::new(input)?;
//! let quoted = lexer.find(|t| t.kind == TokenKind::DoubleQuotedValue).unwrap();
//! assert_eq!(quoted.text(input), br#""hello \"world\"""#);
//! # Ok::<(), dotenv_lexer::LexError>(())
//! ```
//!
//! ## Error Handling
//!
//! Error tokens can be turned into positioned errors on demand:
//!
//! ```rust
//! use dotenv_lexer::{LexError, TokenizedBuffer};
//!
//! let buffer = TokenizedBuffer::from_str("A=1\nB='open")?;
//! for error in buffer.diagnostics() {
//!     match &error {
//!         LexError::UnterminatedValue { position } => {
//!             assert_eq!((position.line, position.column), (2, 3));
//!         }
//!         other => panic!("unexpected error {other}"),
//!     }
//! }
//! # Ok::<(), dotenv_lexer::LexError>(())
//! ```
//!
//! ## C Interface
//!
//! The [`capi`] module exports `DotenvLexer_LexerStructSize`,
//! `DotenvLexer_init` and `DotenvLexer_next` for embedding from C.

pub mod buffer;
pub mod capi;
pub mod error;
pub mod lexer;


pub use buffer::{TokenizedBuffer, tokenize, tokenize_with_config};
pub use error::{DotenvError, ErrorContext, LexError, Position, Span};
pub use lexer::{CHARACTER_TABLE, Lexer, LexerConfig, LexerSnapshot, Token, TokenKind};
