use std::cmp::Ordering;

use serde_json::{Number, Value};

/// JMESPath semantics layered over [`serde_json::Value`].
///
/// Documents are plain `serde_json` values (built with `preserve_order`,
/// so objects keep their insertion order). This trait adds the handful of
/// operations the evaluator and the built-in functions need.
///
/// # Examples
///
/// ```
/// use jmespath_engine::value::JmesValue;
/// use serde_json::json;
///
/// assert!(json!(0).is_truthy());
/// assert!(!json!([]).is_truthy());
/// assert_eq!(json!({"a": 1}).type_name(), "object");
/// assert!(json!(1).structurally_equals(&json!(1.0)));
/// ```
pub trait JmesValue {
    /// Check if the value is truthy (for filters, `||`, `&&` and `!`)
    ///
    /// `false`, `null`, `""`, `[]` and `{}` are falsy. Every number,
    /// including zero, is truthy.
    fn is_truthy(&self) -> bool;

    /// Type name as reported by the `type()` function and error messages
    fn type_name(&self) -> &'static str;

    /// Numeric view, `None` for non-numbers
    fn number_value(&self) -> Option<f64>;

    /// Deep equality where `1` and `1.0` are equal and object key order
    /// is ignored
    fn structurally_equals(&self, other: &Value) -> bool;

    /// Order two numbers or two strings, `None` for any other pairing
    fn compare(&self, other: &Value) -> Option<Ordering>;
}

impl JmesValue for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(_) => true,
            Value::String(s) => !s.is_empty(),
            Value::Array(arr) => !arr.is_empty(),
            Value::Object(obj) => !obj.is_empty(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn number_value(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    fn structurally_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_equals(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.structurally_equals(y)))
            }
            _ => self == other,
        }
    }

    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(_), Value::Number(_)) => {
                self.number_value()?.partial_cmp(&other.number_value()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_u64(), b.as_u64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
    }
}

/// Wrap a float result, `null` when it is not finite.
pub fn float_value(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Wrap a float that has no fractional part, as an integer when it fits.
pub fn integral_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        float_value(n)
    }
}
