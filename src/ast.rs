//! # Corn - Tokens and Syntax Tree
//!
//! This module defines the two intermediate representations of the Corn
//! pipeline:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[rules]** - The uniform rule tree produced by the parser
//!
//! ## Quick Start
//!
//! ```text
//! let {
//!     $port = 8080
//!     $defaults = { debug = false }
//! } in {
//!     ..$defaults
//!     server.port = $port
//!     server.name = "api-$port"
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Inputs
//!
//! Values declared in the `let { ... } in` block are referenced anywhere
//! below as `$name`. Names starting with `$env_` are first looked up in the
//! environment (`$env_HOME` reads `HOME`).
//!
//! ### Paths
//!
//! `a.b.c = 1` creates the intermediate objects `a` and `a.b` on demand.
//! Keys containing dots or whitespace are single-quoted: `'a.b' = 1`.
//!
//! ### Spreads
//!
//! `..$name` inlines the keys of an object input into an object, or the
//! elements of an array input into an array.
//!
//! ### Strings
//!
//! Strings interpolate string inputs (`"$name"`), support the escapes
//! `\\ \" \n \r \t \$ \uXXXX`, and multi-line strings without escapes are
//! dedented.
pub mod rules;
pub mod tokens;

pub use rules::{Literal, Rule, RuleKind};
pub use tokens::{Token, TokenKind};
