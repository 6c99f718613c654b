//! Exercises the C binding the way an embedding program would

use dotenv_lexer::TokenKind;
use dotenv_lexer::capi::{
    DotenvLexer_Lexer, DotenvLexer_LexerStructSize, DotenvLexer_Token, DotenvLexer_init,
    DotenvLexer_next,
};
use std::alloc::{Layout, alloc, dealloc};
use std::ffi::c_char;

/// Lexes `input` through the C entry points using raw, caller-owned storage
fn lex_via_capi(input: &[u8]) -> Vec<DotenvLexer_Token> {
    let size = DotenvLexer_LexerStructSize();
    let layout = Layout::from_size_align(size, std::mem::align_of::<DotenvLexer_Lexer>()).unwrap();
    let mut tokens = Vec::new();

    unsafe {
        let storage = alloc(layout) as *mut DotenvLexer_Lexer;
        assert!(!storage.is_null());
        DotenvLexer_init(storage, input.as_ptr() as *const c_char, input.len());
        loop {
            let token = DotenvLexer_next(storage);
            tokens.push(token);
            if token.kind == TokenKind::EOF {
                break;
            }
        }
        dealloc(storage as *mut u8, layout);
    }

    tokens
}

#[test]
fn test_reference_program_output() {
    let kinds: Vec<u32> = lex_via_capi(b"foo=bar bar=baz")
        .iter()
        .map(|t| t.kind as u32)
        .collect();
    assert_eq!(kinds, vec![1, 8, 1, 7, 1, 8, 1, 6]);
}

#[test]
fn test_capi_matches_native_lexer() {
    let input = b"# c\nA='x'\nB=\"y\\\"z\"\nC=\x01\nD=\"open";
    let native = dotenv_lexer::tokenize(input).unwrap();
    assert_eq!(lex_via_capi(input), native);
}

#[test]
fn test_empty_input() {
    let tokens = lex_via_capi(b"");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(tokens[0].start, 0);
}

#[test]
fn test_reinitialize_storage() {
    let first = b"A=1";
    let second = b"B";
    let size = DotenvLexer_LexerStructSize();
    let layout = Layout::from_size_align(size, std::mem::align_of::<DotenvLexer_Lexer>()).unwrap();

    unsafe {
        let storage = alloc(layout) as *mut DotenvLexer_Lexer;
        DotenvLexer_init(storage, first.as_ptr() as *const c_char, first.len());
        assert_eq!(DotenvLexer_next(storage).kind, TokenKind::Value);

        DotenvLexer_init(storage, second.as_ptr() as *const c_char, second.len());
        let token = DotenvLexer_next(storage);
        assert_eq!((token.kind, token.start, token.end), (TokenKind::Value, 0, 1));
        assert_eq!(DotenvLexer_next(storage).kind, TokenKind::EOF);
        dealloc(storage as *mut u8, layout);
    }
}

#[test]
fn test_token_layout_matches_header() {
    // Four uint32_t fields followed by a C enum.
    assert_eq!(std::mem::size_of::<DotenvLexer_Token>(), 20);
    assert_eq!(std::mem::align_of::<DotenvLexer_Token>(), 4);
}
