//! Edge-case coverage for the scanner: inputs that have historically
//! broken hand-written lexers.

use crate::{Lexer, Token};
use hexc_util::Handler;

fn lex(source: &str) -> (Vec<Token>, Handler) {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler)
        .tokenize()
        .into_iter()
        .map(|t| t.token)
        .collect();
    (tokens, handler)
}

#[test]
fn test_only_whitespace() {
    let (tokens, handler) = lex("  \t\n\n   ");
    assert_eq!(tokens, vec![Token::Eof]);
    assert!(!handler.has_errors());
}

#[test]
fn test_only_comment() {
    let (tokens, handler) = lex("// nothing here");
    assert_eq!(tokens, vec![Token::Eof]);
    assert!(!handler.has_errors());
}

#[test]
fn test_comment_at_eof_without_newline() {
    let (tokens, _) = lex("val x = 1 // trailing");
    assert_eq!(tokens.last(), Some(&Token::Eof));
    assert_eq!(tokens.len(), 5);
}

#[test]
fn test_consecutive_comments() {
    let (tokens, _) = lex("// one\n// two\nreturn");
    assert_eq!(tokens, vec![Token::Return, Token::Eof]);
}

#[test]
fn test_single_slash_is_division() {
    let (tokens, handler) = lex("a / b");
    assert!(!handler.has_errors());
    assert_eq!(tokens[1], Token::Slash);
}

#[test]
fn test_adjacent_operators_no_whitespace() {
    let (tokens, _) = lex("a<=b!=c");
    assert_eq!(tokens[1], Token::LtEq);
    assert_eq!(tokens[3], Token::BangEq);
}

#[test]
fn test_bang_followed_by_ident() {
    let (tokens, _) = lex("!flag");
    assert_eq!(tokens[0], Token::Bang);
    assert!(matches!(tokens[1], Token::Ident(_)));
}

#[test]
fn test_lone_ampersand_is_error() {
    let (_, handler) = lex("a & b");
    assert_eq!(handler.error_count(), 1);
}

#[test]
fn test_token_after_stray_character_keeps_its_span() {
    let handler = Handler::new();
    let tokens = Lexer::new("@x", &handler).tokenize();
    assert_eq!(handler.error_count(), 1);

    // The identifier's span must cover `x` alone, not the stray `@`.
    assert!(matches!(tokens[0].token, Token::Ident(_)));
    assert_eq!(tokens[0].span.start, 1);
    assert_eq!(tokens[0].span.end, 2);
    assert_eq!(tokens[0].span.column, 2);
}

#[test]
fn test_long_run_of_stray_characters() {
    // Resynchronization is iterative: thousands of stray bytes must
    // produce one error each without exhausting the stack.
    let source = format!("{}val", "#".repeat(10_000));
    let (tokens, handler) = lex(&source);
    assert_eq!(handler.error_count(), 10_000);
    assert_eq!(tokens, vec![Token::Val, Token::Eof]);
}

#[test]
fn test_lone_pipe_is_error() {
    let (_, handler) = lex("a | b");
    assert_eq!(handler.error_count(), 1);
}

#[test]
fn test_number_adjacent_to_conversion() {
    // `42:i64` must lex as Number, Colon, I64; the colon never glues
    // onto the number.
    let (tokens, handler) = lex("42:i64");
    assert!(!handler.has_errors());
    assert!(matches!(tokens[0], Token::Number(_)));
    assert_eq!(tokens[1], Token::Colon);
    assert_eq!(tokens[2], Token::I64);
}

#[test]
fn test_float_exponent_variants() {
    let (tokens, handler) = lex("1e9 1E9 1e+9 1e-9 2.5e3");
    assert!(!handler.has_errors());
    assert_eq!(tokens.len(), 6);
}

#[test]
fn test_exponent_missing_digits() {
    let (_, handler) = lex("1e");
    assert_eq!(handler.error_count(), 1);
}

#[test]
fn test_string_with_embedded_comment_marker() {
    let (tokens, handler) = lex(r#""not // a comment""#);
    assert!(!handler.has_errors());
    match tokens[0] {
        Token::Str(s) => assert_eq!(s.as_str(), "not // a comment"),
        _ => panic!("expected string"),
    }
}

#[test]
fn test_string_unknown_escape_recovers() {
    let (tokens, handler) = lex(r#""bad\qescape" val"#);
    assert_eq!(handler.error_count(), 1);
    assert!(matches!(tokens[0], Token::Str(_)));
    assert_eq!(tokens[1], Token::Val);
}

#[test]
fn test_string_terminated_by_newline_keeps_lexing() {
    let (tokens, handler) = lex("\"open\nval x = 1");
    assert!(handler.has_errors());
    assert!(tokens.contains(&Token::Val));
}

#[test]
fn test_unicode_in_source_is_rejected_outside_strings() {
    let (_, handler) = lex("val π = 3");
    assert!(handler.has_errors());
}

#[test]
fn test_unicode_inside_string_is_fine() {
    let (tokens, handler) = lex("\"héllo ✓\"");
    assert!(!handler.has_errors());
    match tokens[0] {
        Token::Str(s) => assert_eq!(s.as_str(), "héllo ✓"),
        _ => panic!("expected string"),
    }
}

#[test]
fn test_underscored_identifiers() {
    let (tokens, handler) = lex("_x __private x_1");
    assert!(!handler.has_errors());
    assert_eq!(tokens.len(), 4);
    assert!(tokens[..3].iter().all(|t| matches!(t, Token::Ident(_))));
}
