//! Evaluate corn documents into JSON

use super::{CliError, corn_to_json};
use crate::{Lexer, Parser, evaluate};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The Corn document to evaluate
    pub source: String,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Document evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Execute a corn check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        let tokens = Lexer::new(&options.source).tokenize()?;
        Parser::new(tokens).parse()?;
        return Ok(CheckResult::SyntaxValid);
    }

    let evaluation = evaluate(&options.source)?;
    Ok(CheckResult::Success(corn_to_json(evaluation.into_value())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str, syntax_only: bool) -> Result<CheckResult, CliError> {
        execute_check(&CheckOptions {
            source: source.to_string(),
            syntax_only,
        })
    }

    #[test]
    fn evaluates_to_ordered_json() {
        let result = check("{ z = 1 a = [ true null ] m.n = 1.5 }", false).unwrap();
        let CheckResult::Success(json) = result else {
            panic!("expected evaluated output");
        };
        assert_eq!(
            serde_json::to_string(&json).unwrap(),
            r#"{"z":1,"a":[true,null],"m":{"n":1.5}}"#
        );
    }

    #[test]
    fn syntax_only_skips_evaluation() {
        let result = check("{ a = $missing }", true).unwrap();
        assert!(matches!(result, CheckResult::SyntaxValid));

        let err = check("{ a = $missing }", false).unwrap_err();
        assert_eq!(err.to_string(), "evaluation error: input `$missing` does not exist");
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = check("{ a = }", true).unwrap_err();
        assert!(matches!(err, CliError::Corn(crate::Error::Lex(_))));
    }
}
