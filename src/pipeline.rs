//! The single entry point: source text in, evaluated document out.

use thiserror::Error;
use tracing::debug;

use crate::{
    ast::Token,
    env::{EnvSource, ProcessEnv},
    evaluator::{EvalError, Evaluation, Evaluator},
    lexer::{LexError, Lexer},
    parser::{ParseError, Parser},
};

/// Any error produced while turning source text into a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// Fewer than the two tokens every document needs
    #[error("token stream too short ({0} tokens)")]
    TooShort(usize),

    #[error("expected first token to be one of `let` or `{{`, got {0}")]
    UnexpectedFirstToken(Token),

    #[error("expected last token to be `}}`, got {0}")]
    UnexpectedLastToken(Token),
}

/// Evaluates a Corn document, reading `$env_` overrides from the process
/// environment.
///
/// # Examples
///
/// ```
/// use corn_lang::{Value, evaluate};
///
/// let evaluation = evaluate(r#"
///     let { $name = "corn" } in {
///         package.name = $name
///         package.tags = [ "config" "$name" ]
///     }
/// "#).unwrap();
///
/// let value = evaluation.into_value();
/// assert_eq!(value.pointer("package.name"), Some(&Value::from("corn")));
/// ```
pub fn evaluate(source: &str) -> Result<Evaluation, Error> {
    evaluate_with_env(source, ProcessEnv)
}

/// Evaluates a Corn document, reading `$env_` overrides from `env`.
pub fn evaluate_with_env<E: EnvSource>(source: &str, env: E) -> Result<Evaluation, Error> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(), "tokenized source");
    check_token_stream(&tokens)?;

    let ast = Parser::new(tokens).parse()?;
    let evaluation = Evaluator::with_env(env).eval_config(&ast)?;
    debug!(keys = evaluation.value.len(), "evaluated document");
    Ok(evaluation)
}

/// Gross shape checks done before parsing.
fn check_token_stream(tokens: &[Token]) -> Result<(), Error> {
    let (first, last) = match tokens {
        [first, .., last] => (first, last),
        _ => return Err(Error::TooShort(tokens.len())),
    };

    if !matches!(first, Token::Let | Token::BraceOpen) {
        return Err(Error::UnexpectedFirstToken(first.clone()));
    }
    if *last != Token::BraceClose {
        return Err(Error::UnexpectedLastToken(last.clone()));
    }
    Ok(())
}
