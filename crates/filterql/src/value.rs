//! Dynamically-typed values produced by host accessor functions.

use std::fmt;

/// The result of invoking an accessor.
///
/// Comparisons only accept [`Value::Int`] and [`Value::Str`]; membership
/// against another call additionally needs [`Value::IntList`] or
/// [`Value::StrList`] on the right-hand side. The remaining variants are only
/// useful as bare calls, where they are interpreted by [`Value::is_truthy`].
///
/// # Examples
///
/// ```
/// use filterql::Value;
///
/// assert!(Value::from(3).is_truthy());
/// assert!(!Value::from("").is_truthy());
/// assert!(!Value::IntList(vec![]).is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
    /// Boolean
    Bool(bool),
    /// List of integers, the right-hand side of `IN call(...)`
    IntList(Vec<i64>),
    /// List of strings, the right-hand side of `IN call(...)`
    StrList(Vec<String>),
    /// Floating-point number
    Float(f64),
    /// Absence of a value
    Null,
}

impl Value {
    /// Returns true if this is the zero value of its type.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Str(s) => s.is_empty(),
            Value::Bool(b) => !*b,
            Value::IntList(items) => items.is_empty(),
            Value::StrList(items) => items.is_empty(),
            Value::Float(n) => *n == 0.0,
            Value::Null => true,
        }
    }

    /// Interprets the value as a condition: anything but a zero value is true.
    pub fn is_truthy(&self) -> bool {
        !self.is_zero()
    }

    /// Human-readable type name, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::IntList(_) => "list of int",
            Value::StrList(_) => "list of string",
            Value::Float(_) => "float",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::IntList(items) => write!(f, "{:?}", items),
            Value::StrList(items) => write!(f, "{:?}", items),
            Value::Float(n) => write!(f, "{}", n),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::IntList(items)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::StrList(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness_of_scalars() {
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_truthiness_of_lists() {
        assert!(Value::IntList(vec![0]).is_truthy());
        assert!(!Value::IntList(vec![]).is_truthy());
        assert!(Value::StrList(vec![String::new()]).is_truthy());
        assert!(!Value::StrList(vec![]).is_truthy());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Str("a".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("it's").to_string(), "\"it's\"");
        assert_eq!(Value::IntList(vec![1, 3]).to_string(), "[1, 3]");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
