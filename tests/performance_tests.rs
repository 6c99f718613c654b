//! Performance tests for .env lexing
//!
//! These tests verify that the lexer stays linear in input size and keeps a
//! comfortable throughput on realistic files.

use dotenv_lexer::{TokenKind, tokenize};
use std::time::Instant;

fn generate_env(entries: usize) -> String {
    let mut content = String::from("# generated configuration\n");
    for i in 0..entries {
        content.push_str(&format!(
            "SERVICE_{i}_HOST=host-{i}.internal\n\
             SERVICE_{i}_NAME='Service number {i}'\n\
             SERVICE_{i}_URL=\"https://host-{i}.internal:{port}/api?q=\\\"x\\\"\" # endpoint\n",
            port = 8000 + i % 1000
        ));
    }
    content
}

#[test]
fn test_small_env_performance() {
    let input = generate_env(10);

    // Warm up
    for _ in 0..10 {
        let _ = tokenize(input.as_bytes()).unwrap();
    }

    let iterations = 1000;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = tokenize(input.as_bytes()).unwrap();
    }
    let per_iteration = start.elapsed() / iterations;

    println!(
        "Small env performance: {:?} per tokenize ({} iterations)",
        per_iteration, iterations
    );
    assert!(
        per_iteration.as_millis() < 5,
        "Small env tokenizing should be under 5ms"
    );
}

#[test]
fn test_large_env_throughput() {
    let input = generate_env(5000);

    let start = Instant::now();
    let tokens = tokenize(input.as_bytes()).unwrap();
    let duration = start.elapsed();
    let throughput = (input.len() as f64 / 1_000_000.0) / duration.as_secs_f64();

    println!(
        "Large env performance: {:?} for {} bytes, {:.2} MB/s throughput",
        duration,
        input.len(),
        throughput
    );

    assert!(!tokens.iter().any(|t| t.kind.is_error()));
    assert_eq!(
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::DoubleQuotedValue)
            .count(),
        5000
    );
    assert!(
        duration.as_secs() < 5,
        "Large env tokenizing should complete within 5 seconds"
    );
}
