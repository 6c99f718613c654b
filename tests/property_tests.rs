//! Property-based checks over arbitrary input

use dotenv_lexer::{Lexer, LexerConfig, TokenKind, tokenize, tokenize_with_config};
use proptest::prelude::*;

/// Inputs biased towards the bytes the lexer actually branches on
fn dotenv_like() -> impl Strategy<Value = Vec<u8>> {
    let interesting = prop::sample::select(vec![
        b'=', b'#', b'\'', b'"', b'\\', b' ', b'\t', b'\r', b'\n', b'A', b'z', b'0', b'_', 0x00,
        0x1b, 0x7f, 0xc3, 0xa9,
    ]);
    prop::collection::vec(prop_oneof![interesting, any::<u8>()], 0..256)
}

proptest! {
    #[test]
    fn tokens_partition_input(input in dotenv_like()) {
        let tokens = tokenize(&input).unwrap();
        let mut cursor = 0u32;
        for token in &tokens {
            prop_assert_eq!(token.start, cursor);
            prop_assert!(token.start <= token.end);
            cursor = token.end;
        }
        prop_assert_eq!(cursor as usize, input.len());

        let eof = tokens.last().unwrap();
        prop_assert_eq!(eof.kind, TokenKind::EOF);
        prop_assert!(eof.is_empty());
        prop_assert!(tokens[..tokens.len() - 1].iter().all(|t| !t.is_empty() && t.kind != TokenKind::EOF));
    }

    #[test]
    fn lexing_is_deterministic(input in dotenv_like()) {
        prop_assert_eq!(tokenize(&input).unwrap(), tokenize(&input).unwrap());
    }

    #[test]
    fn eof_repeats_unchanged(input in dotenv_like(), extra in 1usize..8) {
        let mut lexer = Lexer::new(&input).unwrap();
        while lexer.next().is_some() {}
        let eof = lexer.next_token();
        for _ in 0..extra {
            prop_assert_eq!(lexer.next_token(), eof);
        }
        prop_assert!(lexer.is_at_end());
    }

    #[test]
    fn lines_never_decrease(input in dotenv_like()) {
        let tokens = tokenize(&input).unwrap();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }

    #[test]
    fn final_line_matches_terminator_count(input in dotenv_like()) {
        let tokens = tokenize(&input).unwrap();
        let mut expected = 1u32;
        for (idx, &byte) in input.iter().enumerate() {
            let counts = byte == b'\n' || (byte == b'\r' && input.get(idx + 1) != Some(&b'\n'));
            if counts {
                expected += 1;
            }
        }
        prop_assert_eq!(tokens.last().unwrap().line, expected);
    }

    #[test]
    fn split_crlf_counts_every_byte(input in dotenv_like()) {
        let config = LexerConfig { crlf_as_single_terminator: false, ..LexerConfig::default() };
        let tokens = tokenize_with_config(&input, config).unwrap();
        let expected = 1 + input.iter().filter(|&&b| b == b'\n' || b == b'\r').count() as u32;
        prop_assert_eq!(tokens.last().unwrap().line, expected);
    }

    #[test]
    fn error_tokens_diagnose(input in dotenv_like()) {
        let mut lexer = Lexer::new(&input).unwrap();
        let tokens: Vec<_> = lexer.by_ref().collect();
        for token in &tokens {
            prop_assert_eq!(lexer.diagnose(token).is_some(), token.kind.is_error());
            if token.kind == TokenKind::Error_InvalidCharacter {
                prop_assert_eq!(token.len(), 1);
            }
        }
    }
}
