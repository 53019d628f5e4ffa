use std::fmt;

/// A lexical token produced by the [`Lexer`](crate::lexer::Lexer).
///
/// Static tokens carry no data; dynamic tokens (numbers, names, string
/// fragments) carry the literal value they were read from.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Delimiters
    /// Opens an object or an input block
    BraceOpen,

    /// Closes an object or an input block
    BraceClose,

    /// Opens an array
    BracketOpen,

    /// Closes an array
    BracketClose,

    /// Separates a path or input name from its value
    Equals,

    /// Opens or closes a string literal
    DoubleQuote,

    /// Spread operator, always followed by an input
    ///
    /// # Examples
    /// ```text
    /// { ..$defaults port = 8080 }
    /// [ ..$base 4 5 ]
    /// ```
    Spread,

    /// Separates the segments of a key path
    ///
    /// # Examples
    /// ```text
    /// server.http.port = 80
    /// ```
    PathSeparator,

    // Keywords
    /// Starts the input block
    Let,

    /// Ends the input block
    In,

    /// Boolean `true`
    True,

    /// Boolean `false`
    False,

    /// Null value
    Null,

    // Dynamic
    /// A single key of a path, bare or single-quoted
    ///
    /// # Examples
    /// ```text
    /// name
    /// 'key with spaces'
    /// ```
    PathSegment(String),

    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// 1.5e10
    /// ```
    Float(f64),

    /// Decimal or hexadecimal integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1_000_000
    /// 0xff
    /// ```
    Integer(i64),

    /// An escape sequence inside a string literal, already decoded
    ///
    /// # Examples
    /// ```text
    /// \n
    /// \"
    /// \u00e9
    /// ```
    CharEscape(char),

    /// A run of plain characters inside a string literal
    CharSequence(String),

    /// Reference to a declared input, including the leading `$`
    ///
    /// # Examples
    /// ```text
    /// $name
    /// $env_HOME
    /// ```
    Input(String),
}

/// The data-free discriminant of a [`Token`], used when describing what the
/// parser expected at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Equals,
    DoubleQuote,
    Spread,
    PathSeparator,
    Let,
    In,
    True,
    False,
    Null,
    PathSegment,
    Float,
    Integer,
    CharEscape,
    CharSequence,
    Input,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::BraceOpen => TokenKind::BraceOpen,
            Token::BraceClose => TokenKind::BraceClose,
            Token::BracketOpen => TokenKind::BracketOpen,
            Token::BracketClose => TokenKind::BracketClose,
            Token::Equals => TokenKind::Equals,
            Token::DoubleQuote => TokenKind::DoubleQuote,
            Token::Spread => TokenKind::Spread,
            Token::PathSeparator => TokenKind::PathSeparator,
            Token::Let => TokenKind::Let,
            Token::In => TokenKind::In,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Null => TokenKind::Null,
            Token::PathSegment(_) => TokenKind::PathSegment,
            Token::Float(_) => TokenKind::Float,
            Token::Integer(_) => TokenKind::Integer,
            Token::CharEscape(_) => TokenKind::CharEscape,
            Token::CharSequence(_) => TokenKind::CharSequence,
            Token::Input(_) => TokenKind::Input,
        }
    }
}

impl TokenKind {
    /// Short name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::BraceOpen => "{",
            TokenKind::BraceClose => "}",
            TokenKind::BracketOpen => "[",
            TokenKind::BracketClose => "]",
            TokenKind::Equals => "=",
            TokenKind::DoubleQuote => "\"",
            TokenKind::Spread => "..",
            TokenKind::PathSeparator => ".",
            TokenKind::Let => "let",
            TokenKind::In => "in",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::PathSegment => "path_seg",
            TokenKind::Float => "float",
            TokenKind::Integer => "int",
            TokenKind::CharEscape => "char_escape",
            TokenKind::CharSequence => "char_seq",
            TokenKind::Input => "input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind().as_str();
        match self {
            Token::PathSegment(s) | Token::CharSequence(s) | Token::Input(s) => {
                write!(f, "`{}({:?})`", name, s)
            }
            Token::Float(n) => write!(f, "`{}({})`", name, n),
            Token::Integer(n) => write!(f, "`{}({})`", name, n),
            Token::CharEscape(c) => write!(f, "`{}({:?})`", name, c),
            _ => write!(f, "`{}`", name),
        }
    }
}
