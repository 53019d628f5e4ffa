use std::{mem, vec};

use thiserror::Error;

use crate::ast::{Literal, Rule, RuleKind, Token, TokenKind};

const CONFIG_START: &[TokenKind] = &[TokenKind::Let, TokenKind::BraceOpen];

const ASSIGN_BLOCK_ITEM: &[TokenKind] = &[TokenKind::Input, TokenKind::BraceClose];

const OBJECT_ITEM: &[TokenKind] = &[
    TokenKind::Spread,
    TokenKind::PathSegment,
    TokenKind::BraceClose,
];

const STRING_PART: &[TokenKind] = &[
    TokenKind::CharSequence,
    TokenKind::CharEscape,
    TokenKind::Input,
    TokenKind::DoubleQuote,
];

const VALUE_START: &[TokenKind] = &[
    TokenKind::BraceOpen,
    TokenKind::BracketOpen,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
    TokenKind::Float,
    TokenKind::Integer,
    TokenKind::DoubleQuote,
    TokenKind::Input,
];

/// Errors that can occur while building the rule tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A token of the wrong kind at a grammar position
    #[error("expected {}, got {found}", describe(.expected))]
    Unexpected {
        expected: Vec<TokenKind>,
        found: Token,
    },

    /// The token stream ended inside a production
    #[error("unexpected end of input, expected {}", describe(.expected))]
    UnexpectedEof { expected: Vec<TokenKind> },

    /// Tokens left over after the root object
    #[error("expected end of input after the root object, got {0}")]
    TrailingInput(Token),
}

fn describe(expected: &[TokenKind]) -> String {
    let kinds: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
    match kinds.as_slice() {
        [single] => single.clone(),
        _ => format!("one of {}", kinds.join(", ")),
    }
}

/// Recursive-descent parser with a single token of lookahead.
///
/// Each grammar production has its own `parse_*` method which checks the
/// current token before consuming it:
///
/// ```text
/// Config      := ('let' AssignBlock Object) | Object
/// AssignBlock := '{' Assignment* '}' 'in'
/// Assignment  := INPUT '=' Value
/// Value       := FLOAT | INTEGER | INPUT | TRUE | FALSE | NULL | String | Object | Array
/// Object      := '{' (Spread | Pair)* '}'
/// Pair        := Path '=' Value
/// Path        := PATHSEG ('.' PATHSEG)*
/// Spread      := '..' INPUT
/// Array       := '[' (Spread | Value)* ']'
/// String      := '"' (CHARSEQ | CHARESCAPE | INPUT)* '"'
/// ```
pub struct Parser {
    tokens: vec::IntoIter<Token>,
    current_token: Option<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current_token = tokens.next();
        Parser {
            tokens,
            current_token,
        }
    }

    /// Moves to the next token, returning the one just consumed.
    fn advance(&mut self) -> Option<Token> {
        mem::replace(&mut self.current_token, self.tokens.next())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current_token.as_ref().map(Token::kind)
    }

    /// Builds the error for the current token not being one of `expected`.
    fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        let expected = expected.to_vec();
        match &self.current_token {
            Some(found) => ParseError::Unexpected {
                expected,
                found: found.clone(),
            },
            None => ParseError::UnexpectedEof { expected },
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind() == kind => Ok(token),
            Some(found) => Err(ParseError::Unexpected {
                expected: vec![kind],
                found,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: vec![kind],
            }),
        }
    }

    /// Consumes a token carrying a name (`input` or `path_seg`).
    fn expect_text(&mut self, kind: TokenKind) -> Result<String, ParseError> {
        match self.expect(kind)? {
            Token::Input(name) | Token::PathSegment(name) => Ok(name),
            found => Err(ParseError::Unexpected {
                expected: vec![kind],
                found,
            }),
        }
    }

    /// Parses a complete document and checks that nothing follows it.
    pub fn parse(mut self) -> Result<Rule, ParseError> {
        let config = self.parse_config()?;
        match self.advance() {
            Some(token) => Err(ParseError::TrailingInput(token)),
            None => Ok(config),
        }
    }

    fn parse_config(&mut self) -> Result<Rule, ParseError> {
        match self.current_kind() {
            Some(TokenKind::Let) => {
                self.advance();
                let inputs = self.parse_assign_block()?;
                let object = self.parse_object()?;
                Ok(Rule::branch(RuleKind::Config, vec![inputs, object]))
            }
            Some(TokenKind::BraceOpen) => {
                let object = self.parse_object()?;
                Ok(Rule::branch(RuleKind::Config, vec![object]))
            }
            _ => Err(self.unexpected(CONFIG_START)),
        }
    }

    /// Parses `{ $name = value ... } in`, the leading `let` already consumed.
    fn parse_assign_block(&mut self) -> Result<Rule, ParseError> {
        self.expect(TokenKind::BraceOpen)?;

        let mut assignments = vec![];
        loop {
            match self.current_kind() {
                Some(TokenKind::Input) => assignments.push(self.parse_assignment()?),
                Some(TokenKind::BraceClose) => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected(ASSIGN_BLOCK_ITEM)),
            }
        }

        self.expect(TokenKind::In)?;
        Ok(Rule::branch(RuleKind::AssignBlock, assignments))
    }

    fn parse_assignment(&mut self) -> Result<Rule, ParseError> {
        let name = self.expect_text(TokenKind::Input)?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_value()?;

        Ok(Rule::branch(
            RuleKind::Assignment,
            vec![
                Rule::leaf(RuleKind::Input, Literal::Text(name)),
                Rule::branch(RuleKind::Value, vec![value]),
            ],
        ))
    }

    fn parse_value(&mut self) -> Result<Rule, ParseError> {
        match self.current_kind() {
            Some(TokenKind::BraceOpen) => return self.parse_object(),
            Some(TokenKind::BracketOpen) => return self.parse_array(),
            Some(TokenKind::DoubleQuote) => return self.parse_string(),
            _ => {}
        }

        let rule = match &self.current_token {
            Some(Token::Float(n)) => Rule::leaf(RuleKind::Float, Literal::Float(*n)),
            Some(Token::Integer(n)) => Rule::leaf(RuleKind::Integer, Literal::Integer(*n)),
            Some(Token::Input(name)) => Rule::leaf(RuleKind::Input, Literal::Text(name.clone())),
            Some(Token::True) => Rule::leaf(RuleKind::Boolean, Literal::Boolean(true)),
            Some(Token::False) => Rule::leaf(RuleKind::Boolean, Literal::Boolean(false)),
            Some(Token::Null) => Rule::new(RuleKind::Null),
            _ => return Err(self.unexpected(VALUE_START)),
        };

        self.advance();
        Ok(rule)
    }

    fn parse_object(&mut self) -> Result<Rule, ParseError> {
        self.expect(TokenKind::BraceOpen)?;

        let mut entries = vec![];
        loop {
            match self.current_kind() {
                Some(TokenKind::Spread) => entries.push(self.parse_spread()?),
                Some(TokenKind::PathSegment) => entries.push(self.parse_pair()?),
                Some(TokenKind::BraceClose) => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected(OBJECT_ITEM)),
            }
        }

        Ok(Rule::branch(RuleKind::Object, entries))
    }

    fn parse_spread(&mut self) -> Result<Rule, ParseError> {
        self.expect(TokenKind::Spread)?;
        let name = self.expect_text(TokenKind::Input)?;
        Ok(Rule::leaf(RuleKind::Spread, Literal::Text(name)))
    }

    fn parse_pair(&mut self) -> Result<Rule, ParseError> {
        let path = self.parse_path()?;
        self.expect(TokenKind::Equals)?;
        let value = self.parse_value()?;
        Ok(Rule::branch(RuleKind::Pair, vec![path, value]))
    }

    fn parse_path(&mut self) -> Result<Rule, ParseError> {
        let mut segments = vec![];

        loop {
            let key = self.expect_text(TokenKind::PathSegment)?;
            segments.push(Rule::leaf(RuleKind::PathSegment, Literal::Text(key)));

            if self.check(TokenKind::PathSeparator) {
                self.advance();
            } else {
                break;
            }
        }

        Ok(Rule::branch(RuleKind::Path, segments))
    }

    fn parse_array(&mut self) -> Result<Rule, ParseError> {
        self.expect(TokenKind::BracketOpen)?;

        let mut items = vec![];
        loop {
            match self.current_kind() {
                Some(TokenKind::Spread) => items.push(self.parse_spread()?),
                Some(TokenKind::BracketClose) => {
                    self.advance();
                    break;
                }
                _ => items.push(self.parse_value()?),
            }
        }

        Ok(Rule::branch(RuleKind::Array, items))
    }

    fn parse_string(&mut self) -> Result<Rule, ParseError> {
        self.expect(TokenKind::DoubleQuote)?;

        let mut parts = vec![];
        loop {
            if self.check(TokenKind::DoubleQuote) {
                self.advance();
                break;
            }

            let part = match &self.current_token {
                Some(Token::CharSequence(s)) => {
                    Rule::leaf(RuleKind::CharSequence, Literal::Text(s.clone()))
                }
                Some(Token::CharEscape(c)) => Rule::leaf(RuleKind::CharEscape, Literal::Char(*c)),
                Some(Token::Input(name)) => Rule::leaf(RuleKind::Input, Literal::Text(name.clone())),
                _ => return Err(self.unexpected(STRING_PART)),
            };
            parts.push(part);
            self.advance();
        }

        Ok(Rule::branch(RuleKind::String, parts))
    }
}

/// Parses a token sequence into a `Config` rule.
pub fn parse(tokens: Vec<Token>) -> Result<Rule, ParseError> {
    Parser::new(tokens).parse()
}
