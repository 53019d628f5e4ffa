use crate::{evaluator::EvalError, value::{Map, Value}};

/// Writes `value` into `object` at the key path `path`.
///
/// Missing intermediate keys are created as empty objects. An existing key
/// is overwritten in place, keeping its position. Walking through a key whose
/// value is not an object fails.
///
/// # Examples
///
/// ```text
/// {}             + a.b = 1  → { a: { b: 1 } }
/// { a: { b: 1 } } + a.c = 2  → { a: { b: 1, c: 2 } }
/// { a: 1 }       + a.b = 2  → error: `a` is an integer
/// ```
pub fn insert_at_path(object: &mut Map, path: &[String], value: Value) -> Result<(), EvalError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(EvalError::MalformedAst("pair with an empty path".to_string()));
    };

    let mut current = object;
    for key in parents {
        let child = current
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));

        current = match child {
            Value::Object(map) => map,
            other => {
                return Err(EvalError::KeyChaining {
                    key: key.clone(),
                    found: other.type_name(),
                });
            }
        };
    }

    current.insert(last.clone(), value);
    Ok(())
}
