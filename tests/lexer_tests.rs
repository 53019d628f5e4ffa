// tests/lexer_tests.rs

use corn_lang::ast::Token;
use corn_lang::lexer::{LexError, LexState, Lexer, tokenize};

fn seg(s: &str) -> Token {
    Token::PathSegment(s.to_string())
}

fn input(s: &str) -> Token {
    Token::Input(s.to_string())
}

fn seq(s: &str) -> Token {
    Token::CharSequence(s.to_string())
}

/// Tokens of `{ key = <value> }` between `=` and the closing brace.
fn value_tokens(value: &str) -> Vec<Token> {
    let tokens = tokenize(&format!("{{ key = {} }}", value)).unwrap();
    assert_eq!(tokens[..3], [Token::BraceOpen, seg("key"), Token::Equals]);
    assert_eq!(tokens.last(), Some(&Token::BraceClose));
    tokens[3..tokens.len() - 1].to_vec()
}

// ============================================================================
// Top Level and Input Block
// ============================================================================

#[test]
fn test_empty_object() {
    assert_eq!(
        tokenize("{}").unwrap(),
        vec![Token::BraceOpen, Token::BraceClose]
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(tokenize("").unwrap(), vec![]);
    assert_eq!(tokenize("   \n\t ").unwrap(), vec![]);
}

#[test]
fn test_input_block() {
    let tokens = tokenize("let { $a = 1 $b = \"x\" } in { }").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Let,
            Token::BraceOpen,
            input("$a"),
            Token::Equals,
            Token::Integer(1),
            input("$b"),
            Token::Equals,
            Token::DoubleQuote,
            seq("x"),
            Token::DoubleQuote,
            Token::BraceClose,
            Token::In,
            Token::BraceOpen,
            Token::BraceClose,
        ]
    );
}

#[test]
fn test_object_value_in_input_block_returns_to_block() {
    let mut lexer = Lexer::new("let { $o = { a = 1 } } in {}");
    let mut states = vec![];
    while let Some(token) = lexer.next_token().unwrap() {
        states.push((token, lexer.state()));
    }

    // after the nested object closes we are back in the input block
    assert_eq!(states[8], (Token::BraceClose, LexState::AssignBlock));
    assert_eq!(states[9], (Token::BraceClose, LexState::AssignBlock));
    assert_eq!(states[10], (Token::In, LexState::TopLevel));
}

// ============================================================================
// Object Keys
// ============================================================================

#[test]
fn test_path_segments() {
    let tokens = tokenize("{ a.b.c = 1 }").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::BraceOpen,
            seg("a"),
            Token::PathSeparator,
            seg("b"),
            Token::PathSeparator,
            seg("c"),
            Token::Equals,
            Token::Integer(1),
            Token::BraceClose,
        ]
    );
}

#[test]
fn test_bare_segment_allows_symbols() {
    let tokens = tokenize("{ foo-bar_baz:1 = 1 }").unwrap();
    assert_eq!(tokens[1], seg("foo-bar_baz:1"));
}

#[test]
fn test_quoted_path_segment() {
    let tokens = tokenize(r"{ 'a.b c' = 1 'it\'s' = 2 }").unwrap();
    assert_eq!(tokens[1], seg("a.b c"));
    assert_eq!(tokens[4], seg("it's"));
}

#[test]
fn test_spread_in_object() {
    let tokens = tokenize("{ ..$base a = 1 }").unwrap();
    assert_eq!(tokens[1], Token::Spread);
    assert_eq!(tokens[2], input("$base"));
    assert_eq!(tokens[3], seg("a"));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_integers() {
    assert_eq!(value_tokens("42"), vec![Token::Integer(42)]);
    assert_eq!(value_tokens("-17"), vec![Token::Integer(-17)]);
    assert_eq!(value_tokens("1_000_000"), vec![Token::Integer(1_000_000)]);
}

#[test]
fn test_integer_underscores_are_lenient() {
    assert_eq!(value_tokens("_1__0_"), vec![Token::Integer(10)]);
}

#[test]
fn test_hex_integers() {
    assert_eq!(value_tokens("0xff"), vec![Token::Integer(255)]);
    assert_eq!(value_tokens("0x1F"), vec![Token::Integer(31)]);
}

#[test]
fn test_floats() {
    assert_eq!(value_tokens("3.14"), vec![Token::Float(3.14)]);
    assert_eq!(value_tokens("-0.5"), vec![Token::Float(-0.5)]);
    assert_eq!(value_tokens("1.5e3"), vec![Token::Float(1500.0)]);
    assert_eq!(value_tokens("2.0E-2"), vec![Token::Float(0.02)]);
}

#[test]
fn test_keywords() {
    assert_eq!(value_tokens("true"), vec![Token::True]);
    assert_eq!(value_tokens("false"), vec![Token::False]);
    assert_eq!(value_tokens("null"), vec![Token::Null]);
}

#[test]
fn test_input_names() {
    assert_eq!(value_tokens("$name"), vec![input("$name")]);
    assert_eq!(value_tokens("$env_HOME_2"), vec![input("$env_HOME_2")]);
}

#[test]
fn test_input_must_start_with_letter() {
    let err = tokenize("{ a = $1 }").unwrap_err();
    assert!(matches!(err, LexError::Stuck { state: LexState::Value, .. }));
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn test_array_elements() {
    let tokens = value_tokens("[ 1 2.5 true \"s\" $x [ ] { } ..$y 0x10 ]");
    assert_eq!(
        tokens,
        vec![
            Token::BracketOpen,
            Token::Integer(1),
            Token::Float(2.5),
            Token::True,
            Token::DoubleQuote,
            seq("s"),
            Token::DoubleQuote,
            input("$x"),
            Token::BracketOpen,
            Token::BracketClose,
            Token::BraceOpen,
            Token::BraceClose,
            Token::Spread,
            input("$y"),
            Token::Integer(16),
            Token::BracketClose,
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_escapes_are_decoded() {
    let tokens = value_tokens(r#""\\\"\n\r\t\$\u0041""#);
    assert_eq!(
        tokens,
        vec![
            Token::DoubleQuote,
            Token::CharEscape('\\'),
            Token::CharEscape('"'),
            Token::CharEscape('\n'),
            Token::CharEscape('\r'),
            Token::CharEscape('\t'),
            Token::CharEscape('$'),
            Token::CharEscape('A'),
            Token::DoubleQuote,
        ]
    );
}

#[test]
fn test_string_interpolation() {
    let tokens = value_tokens(r#""hello $name!""#);
    assert_eq!(
        tokens,
        vec![
            Token::DoubleQuote,
            seq("hello "),
            input("$name"),
            seq("!"),
            Token::DoubleQuote,
        ]
    );
}

#[test]
fn test_string_keeps_comment_markers_and_whitespace() {
    let tokens = value_tokens("\"  // not a comment \n\"");
    assert_eq!(tokens[1], seq("  // not a comment \n"));
}

#[test]
fn test_invalid_escape_is_stuck() {
    let err = tokenize(r#"{ a = "\q" }"#).unwrap_err();
    assert!(matches!(err, LexError::Stuck { state: LexState::StringLiteral, .. }));
}

#[test]
fn test_invalid_unicode_escape_is_stuck() {
    let err = tokenize(r#"{ a = "\uD800" }"#).unwrap_err();
    assert!(matches!(err, LexError::Stuck { state: LexState::StringLiteral, .. }));
}

#[test]
fn test_bare_dollar_in_string_is_stuck() {
    assert!(tokenize(r#"{ a = "cost: $5" }"#).is_err());
    assert!(tokenize(r#"{ a = "cost: \$5" }"#).is_ok());
}

// ============================================================================
// Comments and Errors
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    let tokens = tokenize(
        "// leading comment\n{ // after brace\n  a = 1 // trailing\n  // own line\n}",
    )
    .unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::BraceOpen,
            seg("a"),
            Token::Equals,
            Token::Integer(1),
            Token::BraceClose,
        ]
    );
}

#[test]
fn test_stuck_error_message() {
    let err = tokenize("{ a = ? }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected input \"? }\" at offset 6 while lexing value"
    );
}

#[test]
fn test_unknown_top_level_is_stuck() {
    let err = tokenize("[1]").unwrap_err();
    assert!(matches!(err, LexError::Stuck { state: LexState::TopLevel, offset: 0, .. }));
}

#[test]
fn test_token_display() {
    assert_eq!(Token::BraceOpen.to_string(), "`{`");
    assert_eq!(Token::Integer(42).to_string(), "`int(42)`");
    assert_eq!(seg("a").to_string(), "`path_seg(\"a\")`");
    assert_eq!(input("$x").to_string(), "`input(\"$x\")`");
}
