use std::fmt;

/// Grammar production a [`Rule`] node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Config,
    AssignBlock,
    Assignment,
    Object,
    Pair,
    Path,
    PathSegment,
    Spread,
    Array,
    Input,
    Value,
    Boolean,
    Float,
    Integer,
    String,
    CharSequence,
    CharEscape,
    Null,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Config => "Config",
            RuleKind::AssignBlock => "AssignBlock",
            RuleKind::Assignment => "Assignment",
            RuleKind::Object => "Object",
            RuleKind::Pair => "Pair",
            RuleKind::Path => "Path",
            RuleKind::PathSegment => "PathSegment",
            RuleKind::Spread => "Spread",
            RuleKind::Array => "Array",
            RuleKind::Input => "Input",
            RuleKind::Value => "Value",
            RuleKind::Boolean => "Boolean",
            RuleKind::Float => "Float",
            RuleKind::Integer => "Integer",
            RuleKind::String => "String",
            RuleKind::CharSequence => "CharSequence",
            RuleKind::CharEscape => "CharEscape",
            RuleKind::Null => "Null",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar data attached to a leaf [`Rule`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Char(char),
    /// Names, path segments and character sequences
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Char(c) => write!(f, "{:?}", c),
            Literal::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// A node of the syntax tree.
///
/// The tree is deliberately uniform: every production is a `Rule` with a
/// kind, ordered children and an optional literal payload. The parser only
/// ever builds well-formed trees; the evaluator still checks shapes because
/// trees can also be assembled by hand.
///
/// # Shapes produced by the parser
///
/// ```text
/// Config       [AssignBlock, Object] | [Object]
/// AssignBlock  [Assignment*]
/// Assignment   [Input(name), Value [<value>]]
/// Object       [(Spread(name) | Pair)*]
/// Pair         [Path, <value>]
/// Path         [PathSegment(key)+]
/// Array        [(Spread(name) | <value>)*]
/// String       [(CharSequence(text) | CharEscape(char) | Input(name))*]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub kind: RuleKind,
    pub children: Vec<Rule>,
    pub payload: Option<Literal>,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Rule {
            kind,
            children: Vec::new(),
            payload: None,
        }
    }

    pub fn leaf(kind: RuleKind, payload: Literal) -> Self {
        Rule {
            kind,
            children: Vec::new(),
            payload: Some(payload),
        }
    }

    pub fn branch(kind: RuleKind, children: Vec<Rule>) -> Self {
        Rule {
            kind,
            children,
            payload: None,
        }
    }

    /// The text payload of a name, path segment or character sequence.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Some(Literal::Text(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(payload) = &self.payload {
            write!(f, "({})", payload)?;
        }
        if !self.children.is_empty() {
            f.write_str(" [")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", child)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
