//! Prints the numeric kind of every token in a small .env snippet
//!
//! Drives the lexer through its C entry points, the same way an embedding
//! program allocates opaque state, initializes it and pulls tokens until EOF.
//! Set `RUST_LOG=dotenv_lexer=trace` to see the lexer's own events.

use dotenv_lexer::TokenKind;
use dotenv_lexer::capi::{
    DotenvLexer_Lexer, DotenvLexer_LexerStructSize, DotenvLexer_init, DotenvLexer_next,
};
use std::alloc::{Layout, alloc, dealloc};
use std::ffi::c_char;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = "foo=bar bar=baz";
    let layout = Layout::from_size_align(
        DotenvLexer_LexerStructSize(),
        std::mem::align_of::<DotenvLexer_Lexer>(),
    )
    .expect("lexer layout is valid");

    // SAFETY: storage is sized and aligned for the lexer, and `input` outlives it.
    unsafe {
        let lexer = alloc(layout) as *mut DotenvLexer_Lexer;
        assert!(!lexer.is_null(), "allocation failed");
        DotenvLexer_init(lexer, input.as_ptr() as *const c_char, input.len());

        println!("Hello world!");
        loop {
            let token = DotenvLexer_next(lexer);
            println!("{}", token.kind as u32);
            if token.kind == TokenKind::EOF {
                break;
            }
        }

        dealloc(lexer as *mut u8, layout);
    }
}
