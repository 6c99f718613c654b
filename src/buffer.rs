//! Owned input plus its complete token list
//!
//! [`TokenizedBuffer`] runs a [`Lexer`] to completion once and keeps the
//! result, which is what most tooling (linters, highlighters, a future
//! key/value parser) wants instead of driving the cursor by hand.

use crate::error::{DotenvError, LexError};
use crate::lexer::{Lexer, LexerConfig, Token, TokenKind};
use std::path::Path;

/// An input buffer together with every token lexed from it.
///
/// The token list always ends with a single `EOF` token.
#[derive(Debug, Clone)]
pub struct TokenizedBuffer {
    source: Vec<u8>,
    tokens: Vec<Token>,
    config: LexerConfig,
}

impl TokenizedBuffer {
    pub fn from_bytes(source: Vec<u8>) -> Result<Self, LexError> {
        Self::with_config(source, LexerConfig::default())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self, LexError> {
        Self::from_bytes(source.as_bytes().to_vec())
    }

    /// Reads and tokenizes the file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DotenvError> {
        let path = path.as_ref();
        let source = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), len = source.len(), "read dotenv file");
        Ok(Self::from_bytes(source)?)
    }

    pub fn with_config(source: Vec<u8>, config: LexerConfig) -> Result<Self, LexError> {
        let tokens = tokenize_with_config(&source, config)?;
        tracing::debug!(
            len = source.len(),
            tokens = tokens.len(),
            errors = tokens.iter().filter(|t| t.kind.is_error()).count(),
            "tokenized dotenv buffer"
        );
        Ok(Self {
            source,
            tokens,
            config,
        })
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_at(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Returns the bytes covered by `token`
    pub fn text(&self, token: &Token) -> &[u8] {
        token.text(&self.source)
    }

    /// Tokens other than whitespace, comments and the final `EOF`
    pub fn significant_tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens
            .iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::EOF)
    }

    pub fn has_errors(&self) -> bool {
        self.tokens.iter().any(|t| t.kind.is_error())
    }

    /// Positioned errors for every malformed token, in input order
    pub fn diagnostics(&self) -> Vec<LexError> {
        // Construction already proved the length fits, so this cannot fail.
        let Ok(lexer) = Lexer::with_config(&self.source, self.config) else {
            return Vec::new();
        };
        self.tokens
            .iter()
            .filter_map(|token| lexer.diagnose(token))
            .collect()
    }

    /// Number of lines in the input, as counted by the lexer.
    ///
    /// Lines past `u32::MAX` are not counted, since line numbers saturate there.
    pub fn line_count(&self) -> u32 {
        match self.tokens.last() {
            Some(eof) => eof.line.saturating_sub(self.config.first_line).saturating_add(1),
            None => 0,
        }
    }
}

/// Lexes `input` to completion, returning every token including the final `EOF`
pub fn tokenize(input: &[u8]) -> Result<Vec<Token>, LexError> {
    tokenize_with_config(input, LexerConfig::default())
}

pub fn tokenize_with_config(input: &[u8], config: LexerConfig) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::with_config(input, config)?;
    let mut tokens: Vec<Token> = lexer.by_ref().collect();
    tokens.push(lexer.next_token());
    Ok(tokens)
}
