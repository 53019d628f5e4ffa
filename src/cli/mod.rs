//! CLI support for corn-lang
//!
//! Provides programmatic access to the `corn` CLI functionality for
//! embedding in other tools.

mod check;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::corn_to_json;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Corn(#[from] crate::Error),

    #[error("Invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Pass a file, use --source or pipe a document to stdin.")]
    NoInput,
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Corn(e.into())
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Corn(e.into())
    }
}
