// tests/lexer_tests.rs

use jmespath_engine::ast::{Token, TokenKind};
use jmespath_engine::lexer::{Lexer, tokenize};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn kinds(expression: &str) -> Vec<TokenKind> {
    tokenize(expression)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn first(expression: &str) -> Token {
    Lexer::new(expression).next_token().unwrap()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[rstest]
#[case(".", TokenKind::Dot)]
#[case("*", TokenKind::Star)]
#[case("]", TokenKind::RBracket)]
#[case(",", TokenKind::Comma)]
#[case(":", TokenKind::Colon)]
#[case("@", TokenKind::Current)]
#[case("(", TokenKind::LParen)]
#[case(")", TokenKind::RParen)]
#[case("{", TokenKind::LBrace)]
#[case("}", TokenKind::RBrace)]
#[case("[", TokenKind::LBracket)]
#[case("|", TokenKind::Pipe)]
#[case("&", TokenKind::Expref)]
#[case("!", TokenKind::Not)]
#[case("<", TokenKind::Lt)]
#[case(">", TokenKind::Gt)]
fn test_single_char_tokens(#[case] input: &str, #[case] expected: TokenKind) {
    let token = first(input);
    assert_eq!(token.kind, expected);
    assert_eq!(token.lexeme, input);
    assert_eq!(token.column, 0);
}

#[rstest]
#[case("[]", TokenKind::Flatten)]
#[case("[?", TokenKind::Filter)]
#[case("||", TokenKind::Or)]
#[case("&&", TokenKind::And)]
#[case("==", TokenKind::Eq)]
#[case("!=", TokenKind::Ne)]
#[case("<=", TokenKind::Lte)]
#[case(">=", TokenKind::Gte)]
fn test_two_char_tokens(#[case] input: &str, #[case] expected: TokenKind) {
    assert_eq!(kinds(input), vec![expected, TokenKind::Eof]);
}

#[test]
fn test_bracket_followed_by_space_is_not_flatten() {
    assert_eq!(
        kinds("[ ]"),
        vec![TokenKind::LBracket, TokenKind::RBracket, TokenKind::Eof]
    );
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_unquoted_identifier() {
    let token = first("foo_Bar9 ");
    assert_eq!(token.kind, TokenKind::UnquotedIdentifier);
    assert_eq!(token.lexeme, "foo_Bar9");
}

#[test]
fn test_quoted_identifier_unescapes() {
    let token = first(r#""with \"quotes\" and ✓""#);
    assert_eq!(token.kind, TokenKind::QuotedIdentifier);
    assert_eq!(token.lexeme, "with \"quotes\" and \u{2713}");
}

#[test]
fn test_quoted_identifier_with_space() {
    let tokens = tokenize(r#"foo."bar baz""#).unwrap();
    assert_eq!(tokens[2].kind, TokenKind::QuotedIdentifier);
    assert_eq!(tokens[2].lexeme, "bar baz");
    assert_eq!(tokens[2].column, 4);
}

// ============================================================================
// Numbers
// ============================================================================

#[rstest]
#[case("0", 0)]
#[case("42", 42)]
#[case("-1", -1)]
#[case("-100", -100)]
fn test_numbers(#[case] input: &str, #[case] expected: i64) {
    let token = first(input);
    assert_eq!(token.kind, TokenKind::Number);
    assert_eq!(token.value, Some(json!(expected)));
}

#[test]
fn test_integer_out_of_range() {
    let err = tokenize("foo[99999999999999999999]").unwrap_err();
    assert_eq!(err.column, 4);
    assert_eq!(err.lexeme, "99999999999999999999");
    assert_eq!(
        err.to_string(),
        "Bad jmespath expression: unknown token \"99999999999999999999\" at column 4 in expression: foo[99999999999999999999]"
    );
}

#[test]
fn test_largest_integers_are_accepted() {
    assert_eq!(first("9223372036854775807").value, Some(json!(i64::MAX)));
    assert_eq!(first("-9223372036854775808").value, Some(json!(i64::MIN)));
}

#[test]
fn test_lone_minus_is_an_error() {
    let err = tokenize("foo[-]").unwrap_err();
    assert_eq!(err.column, 4);
    assert_eq!(err.lexeme, "-");
}

// ============================================================================
// Literals
// ============================================================================

#[rstest]
#[case("`true`", json!(true))]
#[case("`null`", json!(null))]
#[case("`1.5`", json!(1.5))]
#[case("`\"text\"`", json!("text"))]
#[case("`[1, 2]`", json!([1, 2]))]
#[case(r#"`{"a": {"b": [null]}}`"#, json!({"a": {"b": [null]}}))]
#[case(r#"`"back\`tick"`"#, json!("back`tick"))]
fn test_json_literals(#[case] input: &str, #[case] expected: serde_json::Value) {
    let token = first(input);
    assert_eq!(token.kind, TokenKind::Literal);
    assert_eq!(token.value, Some(expected));
}

#[test]
fn test_invalid_json_literal() {
    let err = tokenize("`{not json}`").unwrap_err();
    assert_eq!(err.column, 0);
}

#[test]
fn test_raw_string() {
    let token = first(r"'it\'s raw'");
    assert_eq!(token.kind, TokenKind::RawString);
    assert_eq!(token.value, Some(json!("it's raw")));
}

#[test]
fn test_raw_string_keeps_other_escapes() {
    let token = first(r"'a\nb'");
    assert_eq!(token.value, Some(json!(r"a\nb")));
}

#[test]
fn test_unterminated_raw_string() {
    let err = tokenize("foo == 'bar").unwrap_err();
    assert_eq!(err.column, 7);
    assert_eq!(err.lexeme, "'bar");
}

// ============================================================================
// Streams and Errors
// ============================================================================

#[test]
fn test_token_stream() {
    assert_eq!(
        kinds("people[?age > `20`].name | sort(@)"),
        vec![
            TokenKind::UnquotedIdentifier,
            TokenKind::Filter,
            TokenKind::UnquotedIdentifier,
            TokenKind::Gt,
            TokenKind::Literal,
            TokenKind::RBracket,
            TokenKind::Dot,
            TokenKind::UnquotedIdentifier,
            TokenKind::Pipe,
            TokenKind::UnquotedIdentifier,
            TokenKind::LParen,
            TokenKind::Current,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_columns_skip_whitespace() {
    let columns: Vec<usize> = tokenize("a  .\n b")
        .unwrap()
        .into_iter()
        .map(|t| t.column)
        .collect();
    assert_eq!(columns, vec![0, 3, 6, 7]);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("a");
    lexer.next_token().unwrap();
    assert!(lexer.next_token().unwrap().is(TokenKind::Eof));
    assert!(lexer.next_token().unwrap().is(TokenKind::Eof));
}

#[test]
fn test_unknown_character_message() {
    let err = tokenize("foo#bar").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Bad jmespath expression: unknown token \"#\" at column 3 in expression: foo#bar"
    );
}
