//! Environment lookups for `$env_` inputs.
//!
//! The evaluator never reads the process environment directly; it asks an
//! [`EnvSource`]. [`ProcessEnv`] is the real environment, and a plain
//! `HashMap<String, String>` works as a fixed environment in tests.

use std::collections::HashMap;

/// Prefix marking an input as overridable from the environment.
///
/// `$env_HOME` is resolved from the variable `HOME` when it is set and
/// non-empty, falling back to the declared input otherwise.
pub const ENV_PREFIX: &str = "$env_";

pub trait EnvSource {
    /// Returns the value of the variable `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Strips [`ENV_PREFIX`] from an input name, yielding the variable name.
pub fn env_var_name(input: &str) -> Option<&str> {
    input.strip_prefix(ENV_PREFIX).filter(|name| !name.is_empty())
}

#[test]
fn test_env_var_name() {
    assert_eq!(env_var_name("$env_HOME"), Some("HOME"));
    assert_eq!(env_var_name("$env_"), None);
    assert_eq!(env_var_name("$home"), None);
}

#[test]
fn test_map_source() {
    let env = HashMap::from([("PORT".to_string(), "8080".to_string())]);
    assert_eq!(env.var("PORT").as_deref(), Some("8080"));
    assert_eq!((&env).var("HOST"), None);
}
