use std::cell::RefCell;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Literal, Rule, RuleKind},
    dedent::dedent,
    env::{EnvSource, ProcessEnv, env_var_name},
    transform::insert_at_path,
    value::{Map, Value},
};

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Reference to an input that was never declared
    #[error("input `{0}` does not exist")]
    MissingInput(String),

    /// `..$name` inside an array where `$name` is not an array
    #[error("attempted to spread non-array input `{name}` ({found}) into array")]
    SpreadNonArray { name: String, found: &'static str },

    /// `..$name` inside an object where `$name` is not an object
    #[error("attempted to spread non-object input `{name}` ({found}) into object")]
    SpreadNonObject { name: String, found: &'static str },

    /// `"...$name..."` where `$name` is not a string
    #[error("attempted to interpolate `{name}` which is not of type string ({found})")]
    InterpolateNonString { name: String, found: &'static str },

    /// A path walks through a key that holds a non-object value
    #[error("attempted to use key-chaining on non-object type: `{key}` is {found}")]
    KeyChaining { key: String, found: &'static str },

    /// An input (indirectly) refers to itself
    #[error("cyclic input reference: {}", .0.join(" -> "))]
    CyclicInput(Vec<String>),

    /// The rule tree does not have the shape the parser produces
    #[error("malformed syntax tree: {0}")]
    MalformedAst(String),
}

impl EvalError {
    fn unexpected_rule(expected: &str, found: &Rule) -> Self {
        EvalError::MalformedAst(format!("expected `{}`, got {}", expected, found))
    }
}

/// The outcome of evaluating a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Declared inputs, by name including the `$`, bound to their unevaluated value rules
    pub inputs: IndexMap<String, Rule>,
    /// The root object
    pub value: Map,
}

impl Evaluation {
    /// The root object as a [`Value`].
    pub fn into_value(self) -> Value {
        Value::Object(self.value)
    }
}

/// Tree-walking evaluator for rule trees produced by the parser.
///
/// Inputs are resolved lazily: every `$name` reference evaluates the bound
/// rule again. Names currently being resolved are tracked so that inputs
/// referring to themselves fail instead of recursing forever.
pub struct Evaluator<E = ProcessEnv> {
    env: E,
    inputs: IndexMap<String, Rule>,
    resolving: RefCell<Vec<String>>,
}

impl Evaluator<ProcessEnv> {
    /// Creates an evaluator reading `$env_` overrides from the process environment.
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl Default for Evaluator<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnvSource> Evaluator<E> {
    /// Creates an evaluator reading `$env_` overrides from `env`.
    pub fn with_env(env: E) -> Self {
        Evaluator {
            env,
            inputs: IndexMap::new(),
            resolving: RefCell::new(Vec::new()),
        }
    }

    /// Evaluates a `Config` rule into the root object.
    ///
    /// # Examples
    ///
    /// ```
    /// use corn_lang::{Evaluator, Value, lexer, parser};
    ///
    /// let tokens = lexer::tokenize("let { $x = 1 } in { a.b = $x }").unwrap();
    /// let ast = parser::parse(tokens).unwrap();
    ///
    /// let evaluation = Evaluator::new().eval_config(&ast).unwrap();
    /// assert_eq!(evaluation.into_value().pointer("a.b"), Some(&Value::Integer(1)));
    /// ```
    pub fn eval_config(&mut self, ast: &Rule) -> Result<Evaluation, EvalError> {
        if ast.kind != RuleKind::Config {
            return Err(EvalError::unexpected_rule("Config", ast));
        }

        self.inputs.clear();
        let object = match ast.children.as_slice() {
            [block, object] if block.kind == RuleKind::AssignBlock => {
                self.bind_inputs(block)?;
                object
            }
            [object] if object.kind == RuleKind::Object => object,
            [first, ..] => return Err(EvalError::unexpected_rule("AssignBlock` or `Object", first)),
            [] => return Err(EvalError::MalformedAst("empty `Config`".to_string())),
        };
        debug!(inputs = self.inputs.len(), "bound inputs");

        let value = self.eval_object(object)?;
        Ok(Evaluation {
            inputs: std::mem::take(&mut self.inputs),
            value,
        })
    }

    /// Fills the input table from an `AssignBlock`.
    ///
    /// `$b = $a` binds `$b` to whatever `$a` is bound to at this point. If
    /// `$a` is not bound (yet), `$b` keeps referring to it by name.
    fn bind_inputs(&mut self, block: &Rule) -> Result<(), EvalError> {
        for assignment in &block.children {
            let [name_rule, value_rule] = assignment.children.as_slice() else {
                return Err(EvalError::unexpected_rule("Assignment", assignment));
            };
            let name = rule_text(name_rule)?.to_string();

            let value = match value_rule.kind {
                RuleKind::Value => value_rule
                    .children
                    .first()
                    .ok_or_else(|| EvalError::unexpected_rule("Value", value_rule))?,
                _ => value_rule,
            };

            let bound = if value.kind == RuleKind::Input {
                let target = rule_text(value)?;
                self.inputs.get(target).unwrap_or(value).clone()
            } else {
                value.clone()
            };

            self.inputs.insert(name, bound);
        }
        Ok(())
    }

    fn eval_value(&self, rule: &Rule) -> Result<Value, EvalError> {
        match rule.kind {
            RuleKind::Object => self.eval_object(rule).map(Value::Object),
            RuleKind::Array => self.eval_array(rule),
            RuleKind::Boolean => match rule.payload {
                Some(Literal::Boolean(b)) => Ok(Value::Boolean(b)),
                _ => Err(EvalError::unexpected_rule("Boolean", rule)),
            },
            RuleKind::Float => match rule.payload {
                Some(Literal::Float(n)) => Ok(Value::Float(n)),
                _ => Err(EvalError::unexpected_rule("Float", rule)),
            },
            RuleKind::Integer => match rule.payload {
                Some(Literal::Integer(n)) => Ok(Value::Integer(n)),
                _ => Err(EvalError::unexpected_rule("Integer", rule)),
            },
            RuleKind::String => self.eval_string(rule).map(Value::String),
            RuleKind::Input => self.resolve_input(rule_text(rule)?),
            RuleKind::Null => Ok(Value::Null),
            _ => Err(EvalError::MalformedAst(format!("invalid value type: {}", rule))),
        }
    }

    /// Resolves `$name`, honouring `$env_` overrides.
    pub fn resolve_input(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(var) = env_var_name(name)
            && let Some(value) = self.env.var(var).filter(|v| !v.is_empty())
        {
            trace!(input = name, var, "resolved from environment");
            return Ok(Value::String(value));
        }

        let rule = self
            .inputs
            .get(name)
            .ok_or_else(|| EvalError::MissingInput(name.to_string()))?;

        {
            let mut resolving = self.resolving.borrow_mut();
            if let Some(start) = resolving.iter().position(|n| n == name) {
                let mut chain = resolving[start..].to_vec();
                chain.push(name.to_string());
                return Err(EvalError::CyclicInput(chain));
            }
            resolving.push(name.to_string());
        }

        trace!(input = name, "resolving input");
        let result = self.eval_value(rule);
        self.resolving.borrow_mut().pop();
        result
    }

    fn eval_string(&self, rule: &Rule) -> Result<String, EvalError> {
        let mut text = String::new();
        let mut escaped = false;

        for part in &rule.children {
            match (part.kind, &part.payload) {
                (RuleKind::CharSequence, Some(Literal::Text(s))) => text.push_str(s),
                (RuleKind::CharEscape, Some(Literal::Char(c))) => {
                    text.push(*c);
                    escaped = true;
                }
                (RuleKind::Input, Some(Literal::Text(name))) => match self.resolve_input(name)? {
                    Value::String(s) => text.push_str(&s),
                    other => {
                        return Err(EvalError::InterpolateNonString {
                            name: name.clone(),
                            found: other.type_name(),
                        });
                    }
                },
                _ => return Err(EvalError::unexpected_rule("CharSequence", part)),
            }
        }

        if !escaped && text.contains('\n') {
            Ok(dedent(&text))
        } else {
            Ok(text)
        }
    }

    fn eval_array(&self, rule: &Rule) -> Result<Value, EvalError> {
        let mut items = Vec::with_capacity(rule.children.len());

        for child in &rule.children {
            if child.kind == RuleKind::Spread {
                let name = rule_text(child)?;
                match self.resolve_input(name)? {
                    Value::Array(spread) => items.extend(spread),
                    other => {
                        return Err(EvalError::SpreadNonArray {
                            name: name.to_string(),
                            found: other.type_name(),
                        });
                    }
                }
            } else {
                items.push(self.eval_value(child)?);
            }
        }

        Ok(Value::Array(items))
    }

    fn eval_object(&self, rule: &Rule) -> Result<Map, EvalError> {
        if rule.kind != RuleKind::Object {
            return Err(EvalError::unexpected_rule("Object", rule));
        }

        let mut object = Map::new();

        for child in &rule.children {
            match child.kind {
                RuleKind::Spread => {
                    let name = rule_text(child)?;
                    match self.resolve_input(name)? {
                        Value::Object(spread) => object.extend(spread),
                        other => {
                            return Err(EvalError::SpreadNonObject {
                                name: name.to_string(),
                                found: other.type_name(),
                            });
                        }
                    }
                }
                RuleKind::Pair => {
                    let [path, value] = child.children.as_slice() else {
                        return Err(EvalError::unexpected_rule("Pair", child));
                    };
                    let path = eval_path(path)?;
                    let value = self.eval_value(value)?;
                    insert_at_path(&mut object, &path, value)?;
                }
                _ => return Err(EvalError::unexpected_rule("Pair` or `Spread", child)),
            }
        }

        Ok(object)
    }
}

fn eval_path(path: &Rule) -> Result<Vec<String>, EvalError> {
    if path.kind != RuleKind::Path {
        return Err(EvalError::unexpected_rule("Path", path));
    }
    path.children
        .iter()
        .map(|segment| rule_text(segment).map(str::to_string))
        .collect()
}

/// The name or key carried by a leaf rule.
fn rule_text(rule: &Rule) -> Result<&str, EvalError> {
    rule.text()
        .ok_or_else(|| EvalError::MalformedAst(format!("missing name on {}", rule)))
}
