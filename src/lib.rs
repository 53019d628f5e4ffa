pub mod ast;
pub mod cli;
pub mod dedent;
pub mod env;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod transform;
pub mod value;

pub use ast::{Literal, Rule, RuleKind, Token, TokenKind};
pub use env::{ENV_PREFIX, EnvSource, ProcessEnv};
pub use evaluator::{EvalError, Evaluation, Evaluator};
pub use lexer::{LexError, LexState, Lexer};
pub use parser::{ParseError, Parser};
pub use pipeline::{Error, evaluate, evaluate_with_env};
pub use value::{Map, Value};
