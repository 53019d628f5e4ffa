use indexmap::IndexMap;

/// An ordered object: keys keep the position of their first insertion.
pub type Map = IndexMap<String, Value>;

/// A value of an evaluated Corn document.
///
/// Mirrors the JSON data model but keeps integers and floats apart, and
/// objects remember the order their keys were first written in.
///
/// # Examples
///
/// ```
/// use corn_lang::{Map, Value};
///
/// // Scalar values
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(3.14);
/// let string = Value::String("hello".to_string());
///
/// // Collections
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = Map::new();
/// obj.insert("b".to_string(), Value::Integer(1));
/// obj.insert("a".to_string(), Value::Integer(2));
/// obj.insert("b".to_string(), Value::Integer(3));
/// assert_eq!(obj.keys().collect::<Vec<_>>(), ["b", "a"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,

    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit float
    Float(f64),

    String(String),

    Array(Vec<Value>),

    /// Object with insertion-ordered, unique keys
    Object(Map),
}

impl Value {
    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a dotted path (`"a.b.c"`) through nested objects.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |current, key| current.as_object()?.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}
