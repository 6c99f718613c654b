//! C binding for embedding the lexer
//!
//! Mirrors the `dotenv_lexer.h` interface: the caller allocates opaque
//! storage of [`DotenvLexer_LexerStructSize`] bytes, initializes it with
//! [`DotenvLexer_init`] and pulls tokens with [`DotenvLexer_next`] until the
//! `EOF` kind comes back. Tokens are returned by value; no ownership of the
//! input bytes crosses the boundary.

#![allow(non_snake_case, non_camel_case_types)]

use crate::lexer::{Lexer, Token, TokenKind};
use std::ffi::c_char;

/// Opaque lexer state as seen from C
pub type DotenvLexer_Lexer = Lexer<'static>;

/// Token record as seen from C
pub type DotenvLexer_Token = Token;

/// Token kind as seen from C
pub type DotenvLexer_TokenKind = TokenKind;

/// Storage size in bytes required for a lexer.
///
/// Allocations obtained from `malloc` are suitably aligned for it.
#[unsafe(no_mangle)]
pub extern "C" fn DotenvLexer_LexerStructSize() -> usize {
    std::mem::size_of::<DotenvLexer_Lexer>()
}

/// Initializes lexer storage over `input_size` bytes at `input`.
///
/// A null `lexer` is ignored. A null `input` or an input too large for
/// 32-bit offsets produces a lexer that immediately reports `EOF`.
///
/// # Safety
///
/// `lexer` must be null or point to writable storage of at least
/// [`DotenvLexer_LexerStructSize`] bytes, aligned for a pointer. `input` must
/// be null or valid for reads of `input_size` bytes, and must stay alive and
/// unmodified for as long as the lexer is used.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn DotenvLexer_init(
    lexer: *mut DotenvLexer_Lexer,
    input: *const c_char,
    input_size: usize,
) {
    if lexer.is_null() {
        tracing::warn!("DotenvLexer_init called with null lexer storage");
        return;
    }

    let bytes: &'static [u8] = if input.is_null() {
        if input_size != 0 {
            tracing::warn!(input_size, "DotenvLexer_init called with null input");
        }
        &[]
    } else {
        // SAFETY: the caller guarantees `input` is readable for `input_size`
        // bytes and outlives the lexer.
        unsafe { std::slice::from_raw_parts(input.cast::<u8>(), input_size) }
    };

    let state = Lexer::new(bytes).unwrap_or_else(|err| {
        tracing::warn!(%err, "DotenvLexer_init rejected input");
        Lexer::empty()
    });

    // SAFETY: the caller guarantees `lexer` points to suitably sized and
    // aligned storage; it may be uninitialized, so write without dropping.
    unsafe { lexer.write(state) };
}

/// Returns the next token, advancing the lexer.
///
/// A null `lexer` yields an `EOF` token at offset 0.
///
/// # Safety
///
/// `lexer` must be null or point to storage previously initialized with
/// [`DotenvLexer_init`], whose input is still alive.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn DotenvLexer_next(lexer: *mut DotenvLexer_Lexer) -> DotenvLexer_Token {
    // SAFETY: the caller guarantees a non-null `lexer` was initialized and is
    // not aliased for the duration of the call.
    match unsafe { lexer.as_mut() } {
        Some(lexer) => lexer.next_token(),
        None => Token::new(TokenKind::EOF, 0, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;

    #[test]
    fn test_struct_size_matches_layout() {
        assert_eq!(
            DotenvLexer_LexerStructSize(),
            std::mem::size_of::<Lexer<'static>>()
        );
        assert!(DotenvLexer_LexerStructSize() > 0);
    }

    #[test]
    fn test_null_lexer_yields_eof() {
        let token = unsafe { DotenvLexer_next(std::ptr::null_mut()) };
        assert_eq!(token.kind, TokenKind::EOF);
        assert_eq!((token.start, token.end), (0, 0));
    }

    #[test]
    fn test_null_input_is_empty() {
        let mut storage = MaybeUninit::<DotenvLexer_Lexer>::uninit();
        unsafe {
            DotenvLexer_init(storage.as_mut_ptr(), std::ptr::null(), 12);
            let token = DotenvLexer_next(storage.as_mut_ptr());
            assert_eq!(token.kind, TokenKind::EOF);
        }
    }
}
