//! State-stack tokenizer.
//!
//! The same character means different things depending on where it appears
//! (`{` opens an object in value position but is a bare delimiter inside the
//! input block, `"` opens a string in value position and closes it inside
//! one). The lexer therefore keeps an explicit stack of [`LexState`]s and a
//! table of match rules per state, tried in priority order. The first rule
//! that matches emits exactly one token and may push, pop or replace the
//! current state.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::ast::Token;

const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

static INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[A-Za-z][A-Za-z0-9_]*").expect("valid input regex"));
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?").expect("valid float regex")
});
static HEX_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x([0-9A-Fa-f]+)").expect("valid hex regex"));
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9_]+").expect("valid integer regex"));

/// Grammar context the lexer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexState {
    TopLevel,
    AssignBlock,
    /// One-shot: left again right after a single value token
    Value,
    Object,
    Array,
    StringLiteral,
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexState::TopLevel => "top level",
            LexState::AssignBlock => "input block",
            LexState::Value => "value",
            LexState::Object => "object",
            LexState::Array => "array",
            LexState::StringLiteral => "string literal",
        })
    }
}

/// What happens to the state stack after a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(LexState),
    Pop,
    Replace(LexState),
}

#[derive(Clone)]
enum Matcher {
    /// Fixed text producing a fixed token
    Exact(&'static str, Token),
    /// Reads a dynamic token, returning it with the number of bytes consumed
    Dynamic(fn(&str) -> Option<(Token, usize)>),
}

impl Matcher {
    fn apply(&self, input: &str) -> Option<(Token, usize)> {
        match self {
            Matcher::Exact(text, token) => input
                .starts_with(*text)
                .then(|| (token.clone(), text.len())),
            Matcher::Dynamic(matcher) => matcher(input),
        }
    }
}

#[derive(Clone)]
struct MatchRule {
    matcher: Matcher,
    transition: Transition,
}

impl MatchRule {
    const fn new(matcher: Matcher, transition: Transition) -> Self {
        MatchRule {
            matcher,
            transition,
        }
    }

    const fn exact(text: &'static str, token: Token, transition: Transition) -> Self {
        Self::new(Matcher::Exact(text, token), transition)
    }

    const fn dynamic(matcher: fn(&str) -> Option<(Token, usize)>, transition: Transition) -> Self {
        Self::new(Matcher::Dynamic(matcher), transition)
    }
}

use LexState::*;
use Transition::*;

const TOP_LEVEL_RULES: &[MatchRule] = &[
    MatchRule::exact("let", Token::Let, Push(AssignBlock)),
    MatchRule::exact("{", Token::BraceOpen, Push(Object)),
];

const ASSIGN_BLOCK_RULES: &[MatchRule] = &[
    MatchRule::exact("in", Token::In, Pop),
    MatchRule::exact("{", Token::BraceOpen, Stay),
    MatchRule::exact("}", Token::BraceClose, Stay),
    MatchRule::dynamic(match_input, Stay),
    MatchRule::exact("=", Token::Equals, Push(Value)),
];

const OBJECT_RULES: &[MatchRule] = &[
    MatchRule::exact("}", Token::BraceClose, Pop),
    MatchRule::exact("=", Token::Equals, Push(Value)),
    MatchRule::exact("..", Token::Spread, Stay),
    MatchRule::exact(".", Token::PathSeparator, Stay),
    MatchRule::dynamic(match_input, Stay),
    MatchRule::dynamic(match_quoted_path_segment, Stay),
    MatchRule::dynamic(match_path_segment, Stay),
];

const ARRAY_RULES: &[MatchRule] = &[
    MatchRule::exact("]", Token::BracketClose, Pop),
    MatchRule::exact("{", Token::BraceOpen, Push(Object)),
    MatchRule::exact("[", Token::BracketOpen, Push(Array)),
    MatchRule::exact("..", Token::Spread, Stay),
    MatchRule::exact("true", Token::True, Stay),
    MatchRule::exact("false", Token::False, Stay),
    MatchRule::exact("null", Token::Null, Stay),
    MatchRule::exact("\"", Token::DoubleQuote, Push(StringLiteral)),
    MatchRule::dynamic(match_input, Stay),
    MatchRule::dynamic(match_float, Stay),
    MatchRule::dynamic(match_hex_integer, Stay),
    MatchRule::dynamic(match_integer, Stay),
];

const VALUE_RULES: &[MatchRule] = &[
    MatchRule::exact("{", Token::BraceOpen, Replace(Object)),
    MatchRule::exact("[", Token::BracketOpen, Replace(Array)),
    MatchRule::exact("true", Token::True, Pop),
    MatchRule::exact("false", Token::False, Pop),
    MatchRule::exact("null", Token::Null, Pop),
    MatchRule::exact("\"", Token::DoubleQuote, Replace(StringLiteral)),
    MatchRule::dynamic(match_input, Pop),
    MatchRule::dynamic(match_float, Pop),
    MatchRule::dynamic(match_hex_integer, Pop),
    MatchRule::dynamic(match_integer, Pop),
    MatchRule::exact("]", Token::BracketClose, Pop),
];

const STRING_RULES: &[MatchRule] = &[
    MatchRule::exact("\"", Token::DoubleQuote, Pop),
    MatchRule::dynamic(match_input, Stay),
    MatchRule::dynamic(match_char_escape, Stay),
    MatchRule::dynamic(match_char_sequence, Stay),
];

/// Match rules for `state`, most specific first.
fn rules(state: LexState) -> &'static [MatchRule] {
    match state {
        TopLevel => TOP_LEVEL_RULES,
        AssignBlock => ASSIGN_BLOCK_RULES,
        Value => VALUE_RULES,
        Object => OBJECT_RULES,
        Array => ARRAY_RULES,
        StringLiteral => STRING_RULES,
    }
}

/// Errors that can occur while tokenizing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// No match rule of the current state accepts the remaining input
    #[error("unexpected input {found:?} at offset {offset} while lexing {state}")]
    Stuck {
        state: LexState,
        offset: usize,
        found: String,
    },
}

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    states: Vec<LexState>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
            states: vec![TopLevel],
        }
    }

    /// The state on top of the stack.
    pub fn state(&self) -> LexState {
        self.states.last().copied().unwrap_or(TopLevel)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start_matches(WHITESPACE);
            self.position += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                self.position += trimmed.find('\n').unwrap_or(trimmed.len());
            } else {
                break;
            }
        }
    }

    fn transition(&mut self, transition: Transition) {
        match transition {
            Stay => {}
            Push(state) => self.states.push(state),
            Pop => {
                if self.states.len() > 1 {
                    self.states.pop();
                }
            }
            Replace(state) => {
                if let Some(top) = self.states.last_mut() {
                    *top = state;
                }
            }
        }
    }

    /// Reads the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let state = self.state();
        if state != StringLiteral {
            self.skip_trivia();
        }

        let rest = self.rest();
        if rest.is_empty() {
            return Ok(None);
        }

        for rule in rules(state) {
            if let Some((token, consumed)) = rule.matcher.apply(rest)
                && consumed > 0
            {
                self.position += consumed;
                self.transition(rule.transition);
                trace!(token = ?token.kind(), from = %state, to = %self.state(), "matched token");
                return Ok(Some(token));
            }
        }

        Err(LexError::Stuck {
            state,
            offset: self.position,
            found: rest.chars().take(16).collect(),
        })
    }

    /// Consumes the lexer, producing the full token sequence.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Tokenizes `source` in one go.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

fn take_while(input: &str, pred: impl Fn(char) -> bool) -> &str {
    let end = input.find(|c| !pred(c)).unwrap_or(input.len());
    &input[..end]
}

fn match_input(input: &str) -> Option<(Token, usize)> {
    let m = INPUT.find(input)?;
    Some((Token::Input(m.as_str().to_string()), m.end()))
}

fn match_float(input: &str) -> Option<(Token, usize)> {
    let m = FLOAT.find(input)?;
    let n = m.as_str().parse::<f64>().ok()?;
    Some((Token::Float(n), m.end()))
}

fn match_hex_integer(input: &str) -> Option<(Token, usize)> {
    let caps = HEX_INTEGER.captures(input)?;
    let n = i64::from_str_radix(&caps[1], 16).ok()?;
    Some((Token::Integer(n), caps[0].len()))
}

fn match_integer(input: &str) -> Option<(Token, usize)> {
    let m = INTEGER.find(input)?;
    // underscores are separators and may appear anywhere
    let digits = m.as_str().replace('_', "");
    let n = digits.parse::<i64>().ok()?;
    Some((Token::Integer(n), m.end()))
}

fn match_quoted_path_segment(input: &str) -> Option<(Token, usize)> {
    let body = input.strip_prefix('\'')?;
    let mut key = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\'' => return Some((Token::PathSegment(key), i + 2)),
            '\\' if body[i + 1..].starts_with('\'') => {
                key.push('\'');
                chars.next();
            }
            _ => key.push(c),
        }
    }

    None
}

fn match_path_segment(input: &str) -> Option<(Token, usize)> {
    let segment = take_while(input, |c| !WHITESPACE.contains(&c) && c != '=' && c != '.');
    if segment.is_empty() {
        return None;
    }
    Some((Token::PathSegment(segment.to_string()), segment.len()))
}

fn match_char_escape(input: &str) -> Option<(Token, usize)> {
    let body = input.strip_prefix('\\')?;

    if let Some(hex) = body.strip_prefix('u') {
        let digits = hex.get(..4)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let c = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)?;
        return Some((Token::CharEscape(c), 6));
    }

    let c = match body.chars().next()? {
        '\\' => '\\',
        '"' => '"',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '$' => '$',
        _ => return None,
    };
    Some((Token::CharEscape(c), 2))
}

fn match_char_sequence(input: &str) -> Option<(Token, usize)> {
    let seq = take_while(input, |c| c != '"' && c != '\\' && c != '$');
    if seq.is_empty() {
        return None;
    }
    Some((Token::CharSequence(seq.to_string()), seq.len()))
}

#[test]
fn test_object_brace_pushes_and_pops() {
    let mut lexer = Lexer::new("{ a = { } }");
    assert_eq!(lexer.next_token(), Ok(Some(Token::BraceOpen)));
    assert_eq!(lexer.state(), Object);
    assert_eq!(lexer.next_token(), Ok(Some(Token::PathSegment("a".into()))));
    assert_eq!(lexer.next_token(), Ok(Some(Token::Equals)));
    assert_eq!(lexer.state(), Value);
    assert_eq!(lexer.next_token(), Ok(Some(Token::BraceOpen)));
    assert_eq!(lexer.state(), Object);
    assert_eq!(lexer.next_token(), Ok(Some(Token::BraceClose)));
    assert_eq!(lexer.state(), Object);
    assert_eq!(lexer.next_token(), Ok(Some(Token::BraceClose)));
    assert_eq!(lexer.state(), TopLevel);
    assert_eq!(lexer.next_token(), Ok(None));
}

#[test]
fn test_value_state_is_one_shot() {
    let mut lexer = Lexer::new("{ a = 1 b = true }");
    let tokens: Vec<_> = std::iter::from_fn(|| lexer.next_token().ok().flatten()).collect();
    assert_eq!(
        tokens,
        vec![
            Token::BraceOpen,
            Token::PathSegment("a".into()),
            Token::Equals,
            Token::Integer(1),
            Token::PathSegment("b".into()),
            Token::Equals,
            Token::True,
            Token::BraceClose,
        ]
    );
}

#[test]
fn test_string_state_keeps_whitespace() {
    let tokens = tokenize("{ s = \"  hi $name\\n\" }").unwrap();
    assert_eq!(
        tokens[3..7],
        [
            Token::DoubleQuote,
            Token::CharSequence("  hi ".into()),
            Token::Input("$name".into()),
            Token::CharEscape('\n'),
        ]
    );
    assert_eq!(tokens[7], Token::DoubleQuote);
}

#[test]
fn test_stuck_reports_state() {
    let err = tokenize("{ a = ? }").unwrap_err();
    assert_eq!(
        err,
        LexError::Stuck {
            state: Value,
            offset: 6,
            found: "? }".into(),
        }
    );
}
